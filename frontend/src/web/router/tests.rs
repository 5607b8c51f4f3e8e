use super::*;
use leptos::reactive::effect::ImmediateEffect;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 订阅信号并统计订阅者运行次数
fn subscribe<T>(read: ReadSignal<T>) -> (impl Sized, Arc<AtomicUsize>)
where
    T: Send + Sync + 'static,
{
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let effect = ImmediateEffect::new(move || {
        read.track();
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (effect, runs)
}

#[test]
fn test_same_route_does_not_notify_subscribers() {
    let owner = Owner::new();
    owner.with(|| {
        let (route, set_route) = signal(AppRoute::Dashboard);
        let (_effect, runs) = subscribe(route);
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // hash 变化（#agentes、popstate + hashchange）重复加载同一页面
        assert!(!set_if_changed(route, set_route, AppRoute::Dashboard));
        assert!(!set_if_changed(route, set_route, AppRoute::Dashboard));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        assert!(set_if_changed(route, set_route, AppRoute::Profile));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(route.get_untracked(), AppRoute::Profile);
    });
}

#[test]
fn test_pathname_notifies_only_on_change() {
    let owner = Owner::new();
    owner.with(|| {
        let (path, set_path) = signal("/dashboard".to_string());
        let (_effect, runs) = subscribe(path);

        assert!(!set_if_changed(path, set_path, "/dashboard".to_string()));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // 未知路径保持原样，不归一化为 "/"
        assert!(set_if_changed(path, set_path, "/pricing".to_string()));
        assert_eq!(path.get_untracked(), "/pricing");
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    });
}
