use keeply_frontend::App;
use keeply_frontend::web::{beacon, console};
use keeply_shared::ApiConfig;
use leptos::prelude::*;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    console::init_logging();

    mount_to_body(App);

    let config = ApiConfig::from_env();
    beacon::report_page_load(&config);
    beacon::observe_largest_contentful_paint(&config);
}
