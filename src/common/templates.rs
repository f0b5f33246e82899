/// Templates module for the embedded `init` config file.
/// The template is embedded at compile time using include_str! macro
pub fn get_config_template() -> &'static str {
    include_str!("../../templates/neoX.config.json")
}
