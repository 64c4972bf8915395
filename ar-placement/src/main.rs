use ar_placement::engine::core::config::ArConfig;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        let query = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default();
        let config = ArConfig::from_query(&query);

        if let Err(err) = ar_placement::xr::web_driver::install_entry_button(config) {
            web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(&err.to_string()));
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mode = std::env::args()
            .nth(1)
            .map(|arg| {
                ar_placement::InteractionMode::from_string(&arg).unwrap_or_else(|| {
                    eprintln!("Unknown interaction mode '{arg}', using overlay");
                    ar_placement::InteractionMode::default()
                })
            })
            .unwrap_or_default();

        println!("AR placement: simulated {} session", mode.as_str());
        match ar_placement::xr::simulated::run_simulated_session(ArConfig::with_mode(mode), true) {
            Ok(report) => println!(
                "Session ended ({}) after {} frames with {} placed models",
                report.exit_reason.map_or("still running", |reason| reason.as_str()),
                report.frames,
                report.placed.len()
            ),
            Err(err) => {
                eprintln!("Simulated session failed: {err}");
                std::process::exit(1);
            }
        }
    }
}
