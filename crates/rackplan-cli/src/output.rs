use serde::Serialize;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn to_json<T: Serialize>(response: &CliResponse<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            "{{\"success\":false,\"error\":\"could not encode response: {}\"}}",
            e
        )
    })
}

pub fn output_success<T: Serialize>(line: Option<usize>, data: T) {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        line,
        data: Some(data),
        error: None,
    };
    println!("{}", to_json(&response));
}

/// Report a failed action on stderr and keep going.
pub fn output_failure(line: Option<usize>, message: &str) {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        line,
        data: None,
        error: Some(message.to_string()),
    };
    eprintln!("{}", to_json(&response));
}

/// Outputs an error response to stderr and terminates the process with code 1.
pub fn output_error(message: &str) -> ! {
    output_failure(None, message);
    std::process::exit(1);
}
