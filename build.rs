use std::env;

fn main() {
    // Provisioning values are baked in at build time; unset ones fall back
    // to the defaults in `config.rs`.
    for key in ["WIFI_SSID", "WIFI_PASS", "DASHBOARD_TOKEN", "TELEMETRY_URL"] {
        println!("cargo:rerun-if-env-changed={key}");
        if let Ok(value) = env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
