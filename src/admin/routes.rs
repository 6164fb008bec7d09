use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::error;

use super::{templates, AdminError, AdminSurface};

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearForm {
    clear_guild: Option<String>,
}

pub fn router(admin: Arc<AdminSurface>) -> Router {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/dashboard", get(dashboard).post(clear_guild))
        .route("/logout", get(logout))
        .with_state(admin)
}

fn session(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(|c| c.value())
}

fn error_response(e: AdminError) -> Response {
    match e {
        AdminError::Unauthorized | AdminError::Unauthenticated => Redirect::to("/").into_response(),
        AdminError::Storage(inner) => {
            error!("Admin dashboard storage failure: {}", inner);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(templates::error_page("The credential store is unavailable.")),
            )
                .into_response()
        }
    }
}

async fn render_dashboard(admin: &AdminSurface, token: Option<&str>) -> Response {
    match admin.list_guilds(token).await {
        Ok(rows) => Html(templates::dashboard(&rows)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn login_page() -> Html<String> {
    Html(templates::login(None))
}

async fn login(
    State(admin): State<Arc<AdminSurface>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match admin.authenticate(&form.token).await {
        Ok(token) => {
            let cookie = Cookie::build((SESSION_COOKIE, token.into_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), Redirect::to("/dashboard")).into_response()
        }
        Err(_) => Html(templates::login(Some("Invalid token"))).into_response(),
    }
}

async fn dashboard(State(admin): State<Arc<AdminSurface>>, jar: CookieJar) -> Response {
    render_dashboard(&admin, session(&jar)).await
}

async fn clear_guild(
    State(admin): State<Arc<AdminSurface>>,
    jar: CookieJar,
    Form(form): Form<ClearForm>,
) -> Response {
    let token = session(&jar);

    if let Some(guild_id) = form.clear_guild.as_deref().filter(|g| !g.is_empty()) {
        if let Err(e) = admin.revoke(token, guild_id).await {
            return error_response(e);
        }
    }

    render_dashboard(&admin, token).await
}

async fn logout(State(admin): State<Arc<AdminSurface>>, jar: CookieJar) -> Response {
    if let Some(token) = session(&jar) {
        admin.logout(token).await;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_in_memory, CredentialStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn app() -> (Router, Arc<CredentialStore>) {
        let store = Arc::new(CredentialStore::new(open_in_memory().await.unwrap()));
        let admin = Arc::new(AdminSurface::new(Arc::clone(&store), "hunter2".to_string()));
        (router(admin), store)
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Log in and return the `name=value` pair to send back as a cookie
    async fn login_cookie(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(form("/", "token=hunter2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_bad_token_rerenders_login() {
        let (app, _store) = app().await;
        let response = app.oneshot(form("/", "token=nope", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Invalid token"));
    }

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let (app, _store) = app().await;
        let response = app
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_login_list_and_clear() {
        let (app, store) = app().await;
        store.upsert("G1", "sid=abc").await.unwrap();
        store.upsert("<b>G2</b>", "sid=def").await.unwrap();

        let cookie = login_cookie(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("G1"));
        assert!(page.contains("&lt;b&gt;G2&lt;/b&gt;"));
        assert!(!page.contains("sid="));

        let response = app
            .clone()
            .oneshot(form("/dashboard", "clear_guild=G1", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains(">G1<"));
        assert_eq!(store.get("G1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_without_session_keeps_row() {
        let (app, store) = app().await;
        store.upsert("G1", "sid=abc").await.unwrap();

        let response = app
            .oneshot(form("/dashboard", "clear_guild=G1", Some("admin_session=forged")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.get("G1").await.unwrap().as_deref(), Some("sid=abc"));
    }

    #[tokio::test]
    async fn test_logout_invalidates_cookie() {
        let (app, _store) = app().await;
        let cookie = login_cookie(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(
                Request::get("/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_storage_failure_renders_error_page() {
        let (app, store) = app().await;
        let cookie = login_cookie(&app).await;
        store.close().await;

        let response = app
            .oneshot(
                Request::get("/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("unavailable"));
    }
}
