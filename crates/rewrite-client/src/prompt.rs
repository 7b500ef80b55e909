//! Instruction template for the rewrite call.

/// Build the rewrite instruction for one user input.
pub(crate) fn build(input: &str) -> String {
    format!(
        "Task: Extract or transform the following natural language input into a single valid URL or plain text string suitable for a QR code.\n\
        \n\
        Rules:\n\
        - If it's a social handle (e.g., @username on X), convert to the profile URL (e.g., https://x.com/username).\n\
        - If it mentions a website, return the clean URL.\n\
        - If it's just plain text, keep it as text.\n\
        - Return ONLY the resulting string, no explanations.\n\
        - If you are unsure, return the input string as is.\n\
        \n\
        Input: \"{input}\""
    )
}
