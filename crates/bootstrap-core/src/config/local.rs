//! Front-end local-override file defaults

/// File name of the generated override inside the front-end sub-project
pub const LOCAL_ENV_FILE: &str = ".env.local";

/// Fixed default keys for the front-end local override
const LOCAL_ENV_KEYS: &[(&str, &str)] = &[
    ("NETWORK_ID", "preview"),
    ("API_PROJECT_ID", "<your-project-id>"),
    ("EXPLORER_PROJECT_ID", "<your-project-id>"),
];

/// Render the default contents written when the file is absent
pub fn default_local_env() -> String {
    let mut out = String::from("# Local overrides for the front-end. Fill in your project ids.\n");
    for (key, value) in LOCAL_ENV_KEYS {
        out.push_str(&format!("{}={}\n", key, value));
    }
    out
}
