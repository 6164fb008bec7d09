use crate::models::GuildEntry;
use crate::utils::escape_html;

const HEAD: &str = r#"<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">"#;

pub fn login(error: Option<&str>) -> String {
    let alert = error
        .map(|e| format!(r#"<div class="alert alert-danger">{}</div>"#, escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html><head><title>Login</title>
{HEAD}
</head><body class="bg-dark text-light"><div class="container mt-5"><h2>Admin Login</h2>
{alert}
<form method="POST">
  <input type="password" class="form-control mb-3" name="token" placeholder="Enter Admin Token" required>
  <button class="btn btn-primary">Login</button>
</form></div></body></html>"#
    )
}

pub fn dashboard(rows: &[GuildEntry]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let guild_id = escape_html(&row.guild_id);
            format!(
                r#"<tr>
  <td>{guild_id}</td>
  <td>{registered_at}</td>
  <td>
    <form method="POST"><input type="hidden" name="clear_guild" value="{guild_id}">
      <button class="btn btn-sm btn-danger">Clear</button>
    </form>
  </td>
</tr>
"#,
                registered_at = row.registered_at.format("%Y-%m-%d %H:%M:%S UTC"),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html><head><title>Dashboard</title>
{HEAD}
</head><body><div class="container mt-5">
  <div class="d-flex justify-content-between">
    <h2>Rugplay Guilds</h2><a href="/logout" class="btn btn-outline-danger">Logout</a>
  </div>
  <table class="table table-bordered mt-3">
    <thead><tr><th>Guild ID</th><th>Registered At</th><th>Actions</th></tr></thead><tbody>
{body}    </tbody>
  </table>
</div></body></html>"#
    )
}

pub fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Error</title>
{HEAD}
</head><body><div class="container mt-5">
  <div class="alert alert-danger">{}</div>
  <a href="/dashboard" class="btn btn-secondary">Back</a>
</div></body></html>"#,
        escape_html(message)
    )
}
