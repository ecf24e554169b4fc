/// Run configuration: immutable per-run settings, overrides and project files.
pub mod export;
/// Named resolution and encoder quality presets.
pub mod presets;
