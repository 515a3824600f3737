#![no_main]
use libfuzzer_sys::fuzz_target;
use routeswitch::{Route, Router};

fuzz_target!(|data: (Vec<(String, i32)>, String)| {
    let mut router = Router::default();

    for (template, value) in data.0 {
        let _ = router.add_route(Route::new(template, value));
    }

    if let Some(matched) = router.at(&data.1) {
        assert!(matched.params.group(0).is_some());
    }
});
