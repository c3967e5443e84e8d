//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# pdfchat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[api]
# base_url = "https://api.chatpdf.com/v1"
# key_env = "CHAT_PDF_KEY"       # environment variable holding the API key
# connect_timeout_secs = 10      # 1-120
# request_timeout_secs = 120     # 1-600, per chat exchange
# upload_timeout_secs = 300      # 1-1800, per document upload

[export]
# suffix = "_chat"               # paper.pdf -> paper_chat0.txt
# extension = "txt"

[logging]
# level = "INFO"                 # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
