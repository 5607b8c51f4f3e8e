//! 前端指标上报
//!
//! 尽力而为、不阻塞：优先使用 `navigator.sendBeacon`，不可用时退回到
//! 不等待结果的 fetch。任何失败都直接丢弃，遥测不能影响页面。

use keeply_shared::protocol::{ApiRequest, MetricEvent, navigation_load_millis};
use keeply_shared::request::{HttpClient, HttpRequest};
use keeply_shared::ApiConfig;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Blob, BlobPropertyBag, PerformanceEntry, PerformanceNavigationTiming,
    PerformanceObserver, PerformanceObserverEntryList,
};

use super::http::FetchHttpClient;

/// 当前页面路径
pub fn current_pathname() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn try_send_beacon(url: &str, payload: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };

    let parts = js_sys::Array::of1(&JsValue::from_str(payload));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let Ok(blob) = Blob::new_with_str_sequence_and_options(&parts, &options) else {
        return false;
    };

    window
        .navigator()
        .send_beacon_with_opt_blob(url, Some(&blob))
        .unwrap_or(false)
}

/// 发送一个指标事件，不等待、不重试
pub fn report(config: &ApiConfig, event: MetricEvent) {
    let url = config.api_url(MetricEvent::PATH);
    let Ok(payload) = serde_json::to_string(&event) else {
        return;
    };

    if try_send_beacon(&url, &payload) {
        return;
    }

    let Ok(req) = HttpRequest::new(&url, MetricEvent::METHOD).with_json(&event) else {
        return;
    };
    spawn_local(async move {
        if let Err(err) = FetchHttpClient.send(req).await {
            tracing::debug!(error = %err, metric = %event.metric, "metric dropped");
        }
    });
}

pub fn report_page_view(config: &ApiConfig, path: &str) {
    report(config, MetricEvent::page_view(path));
}

/// 注册一次性 window 事件监听
fn listen_window_once(event: &str, callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.unchecked_ref(),
        &options,
    );
}

fn navigation_entry_millis(performance: &web_sys::Performance) -> Option<f64> {
    let entry = performance
        .get_entries_by_type("navigation")
        .get(0)
        .dyn_into::<PerformanceNavigationTiming>()
        .ok()?;
    navigation_load_millis(entry.load_event_end(), entry.duration())
}

/// 上报页面加载耗时（`page_load_ms`）
///
/// 优先使用导航计时条目的 `loadEventEnd`，load 事件尚未结束时
/// 等待 load 事件并以 `performance.now()` 计。
pub fn report_page_load(config: &ApiConfig) {
    let Some(performance) = web_sys::window().and_then(|w| w.performance()) else {
        return;
    };

    if let Some(millis) = navigation_entry_millis(&performance) {
        report(config, MetricEvent::page_load(&current_pathname(), millis));
        return;
    }

    let config = config.clone();
    listen_window_once("load", move || {
        let millis = navigation_entry_millis(&performance).unwrap_or_else(|| performance.now());
        report(&config, MetricEvent::page_load(&current_pathname(), millis));
    });
}

/// 观察最大内容绘制并上报 `lcp_ms`，页面隐藏时停止观察
pub fn observe_largest_contentful_paint(config: &ApiConfig) {
    let config = config.clone();
    let callback = Closure::<dyn Fn(PerformanceObserverEntryList)>::new(
        move |list: PerformanceObserverEntryList| {
            let entries = list.get_entries();
            let Ok(last) = entries.at(-1).dyn_into::<PerformanceEntry>() else {
                return;
            };
            report(
                &config,
                MetricEvent::largest_contentful_paint(&current_pathname(), last.start_time()),
            );
        },
    );

    let Ok(observer) = PerformanceObserver::new(callback.as_ref().unchecked_ref()) else {
        return;
    };
    callback.forget();

    // 部分浏览器不支持该条目类型，observe 会抛出异常
    let init = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&init, &"type".into(), &"largest-contentful-paint".into());
    let _ = js_sys::Reflect::set(&init, &"buffered".into(), &JsValue::TRUE);
    let observed = js_sys::Reflect::get(&observer, &"observe".into())
        .and_then(|f| f.dyn_into::<js_sys::Function>().map_err(JsValue::from))
        .and_then(|observe| observe.call1(&observer, &init));
    if observed.is_err() {
        tracing::debug!("largest-contentful-paint not observable");
        return;
    }

    listen_window_once("pagehide", move || observer.disconnect());
}
