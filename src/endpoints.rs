//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/pinjaman/{loan_id}', use [format_endpoint].

/// The root route which redirects to the loans page.
pub const ROOT: &str = "/";
/// The page listing all loans, the financial summary and the add loan form.
pub const LOANS_VIEW: &str = "/pinjaman";
/// The route the add loan form posts to.
pub const POST_LOAN: &str = "/pinjaman";
/// The route for deleting a loan from the loans page.
pub const DELETE_LOAN: &str = "/pinjaman/{loan_id}";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The JSON route for fetching all loans.
pub const API_GET: &str = "/api/get";
/// The JSON route for adding a loan.
pub const API_ADD: &str = "/api/add";
/// The JSON route for deleting a loan by the `id` query parameter.
pub const API_DELETE: &str = "/api/delete";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/pinjaman/{loan_id}', '{loan_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
