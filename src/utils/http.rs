use crate::error::Result;

/// Get standard user agent string
pub fn get_user_agent() -> &'static str {
    concat!("NikudClient/", env!("CARGO_PKG_VERSION"))
}

/// Build the reqwest client shared by every API call.
///
/// No timeout is configured; a call waits as long as the transport does.
pub fn build_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(get_user_agent())
        .build()?;
    Ok(client)
}
