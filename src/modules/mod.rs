// Module exports for pure logic
pub mod navigation;
pub mod script_surface;     // DOM effects as webview scripts
pub mod state_container;    // Multi-source boolean aggregation
pub mod throttle;           // Resize rate limiting
