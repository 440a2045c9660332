//! Post-navigation script injection.
//!
//! After every committed navigation the bridge injects a side channel into
//! the page: a development loader in debug builds (picks the payload up from
//! a local dev server so it can be hot-edited), the precompiled plugin
//! payload otherwise. Injection is best-effort; failures are swallowed by
//! the caller.

/// Debug-build loader. Pulls the plugin from the dev server.
pub const DEV_LOADER_SCRIPT: &str = r#"
(function() {
    if (window.__weir_plugin__) { return; }
    var s = document.createElement('script');
    s.src = 'http://localhost:8762/plugin.js';
    s.onload = function() { window.__weir_plugin__ = true; };
    (document.head || document.documentElement).appendChild(s);
})();
"#;

/// Release-build payload: installs the page-side message channel that the
/// sniffing pipeline and the extension path talk to.
pub const PLUGIN_PAYLOAD: &str = r#"
(function() {
    if (window.__weir_plugin__) { return; }
    window.__weir_plugin__ = true;
    window.weir = window.weir || {};
    window.weir.postLink = function(msg) {
        if (window.ipc && window.ipc.postMessage) {
            window.ipc.postMessage(JSON.stringify(msg));
        }
    };
})();
"#;

/// The payload for the current build profile.
pub fn payload() -> &'static str {
    if cfg!(debug_assertions) {
        DEV_LOADER_SCRIPT
    } else {
        PLUGIN_PAYLOAD
    }
}
