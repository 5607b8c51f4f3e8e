//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 `HttpClient`。
//! fetch 本身被拒绝时（TypeError：连接被拒绝、CORS 等）归类为网络错误。

use async_trait::async_trait;
use keeply_shared::request::{HttpClient, HttpError, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// 将 fetch 的拒绝值分类
fn classify_fetch_error(value: JsValue) -> HttpError {
    let message = js_error_message(&value);
    if value.is_instance_of::<js_sys::TypeError>() {
        HttpError::Network(message)
    } else {
        HttpError::Request(message)
    }
}

/// 基于浏览器 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build_request(req: &HttpRequest) -> Result<Request, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::Request(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::Request(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(classify_fetch_error)
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = Self::build_request(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(classify_fetch_error)?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::Response(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| HttpError::Response(js_error_message(&e)))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::Response(js_error_message(&e)))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
