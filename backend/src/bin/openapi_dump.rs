//! Print the OpenAPI document as JSON.

use std::io::{self, Write};
use std::process::ExitCode;

use twitter_api::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(err) => {
            writeln!(io::stderr(), "failed to render OpenAPI document: {err}").ok();
            return ExitCode::FAILURE;
        }
    };
    match writeln!(io::stdout(), "{json}") {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
