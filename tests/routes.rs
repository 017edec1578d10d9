use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use axum_extra::extract::cookie::{Cookie, Key};
use passkeep::db::VaultStorage;
use passkeep::server::router::{PasskeepState, passkeep_router};
use std::collections::BTreeMap;
use tempfile::TempDir;
use tower::ServiceExt;

/// A browser stand-in: replays whatever cookies the server set.
struct TestClient {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl TestClient {
    fn new(app: Router) -> Self {
        Self {
            app,
            cookies: BTreeMap::new(),
        }
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        let req = self.with_cookies(Request::builder().method("GET").uri(uri));
        self.send(req.body(Body::empty()).expect("failed to build request"))
            .await
    }

    async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = self
            .with_cookies(Request::builder().method("POST").uri(uri))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req.body(Body::from(body)).expect("failed to build request"))
            .await
    }

    async fn register(&mut self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/register",
            &[("username", username), ("password", password)],
        )
        .await
    }

    async fn login(&mut self, username: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    fn with_cookies(&self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        if self.cookies.is_empty() {
            return builder;
        }
        let header_value = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        builder.header(header::COOKIE, header_value)
    }

    async fn send(&mut self, req: Request<Body>) -> Response<Body> {
        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().expect("set-cookie was not ascii").to_string();
            let cookie = Cookie::parse(raw).expect("unparseable set-cookie");
            if cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
        resp
    }

    fn has_session(&self) -> bool {
        self.cookies.contains_key("user_id")
    }
}

struct TestApp {
    app: Router,
    storage: VaultStorage,
    _dir: TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let database_url = format!("sqlite:{}", dir.path().join("passkeep.sqlite").display());
        let storage = passkeep::db::open(&database_url)
            .await
            .expect("failed to open database");
        let state = PasskeepState::new(storage.clone(), Key::generate(), false);
        Self {
            app: passkeep_router(state),
            storage,
            _dir: dir,
        }
    }

    fn client(&self) -> TestClient {
        TestClient::new(self.app.clone())
    }

    async fn count_users(&self, username: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(self.storage.pool())
            .await
            .expect("count query failed");
        count
    }

    async fn user_id(&self, username: &str) -> i64 {
        self.storage
            .find_user(username)
            .await
            .expect("lookup failed")
            .expect("user missing")
            .id
    }
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response had no location header")
}

async fn body_text(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

fn site<'a>(name: &'a str, url: &'a str, password: &'a str) -> [(&'static str, &'a str); 3] {
    [
        ("site_name", name),
        ("site_url", url),
        ("site_password", password),
    ]
}

#[tokio::test]
async fn root_redirects_to_register() {
    let app = TestApp::spawn().await;
    let resp = app.client().get("/").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/register");
}

#[tokio::test]
async fn register_login_add_and_update_entry() {
    let app = TestApp::spawn().await;
    let mut alice = app.client();

    let resp = alice.register("alice", "pw1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let page = body_text(alice.get("/login").await).await;
    assert!(page.contains("Registered successfully! Please login."));

    let resp = alice.login("alice", "pw1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    assert!(alice.has_session());

    let resp = alice
        .post_form("/add_password", &site("example", "ex.com", "x"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    let alice_id = app.user_id("alice").await;
    let entries = app.storage.list_entries(alice_id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, alice_id);
    assert_eq!(entries[0].site_password, "x");

    let uri = format!("/update_password/{}", entries[0].id);
    let resp = alice.post_form(&uri, &site("example", "ex.com", "y")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let after = app.storage.list_entries(alice_id).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, entries[0].id);
    assert_eq!(after[0].site_name, "example");
    assert_eq!(after[0].site_url, "ex.com");
    assert_eq!(after[0].site_password, "y");

    let resp = alice.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_text(resp).await;
    assert!(page.contains(&format!(r#"action="/update_password/{}""#, entries[0].id)));
    assert!(page.contains(r#"value="y""#));
}

#[tokio::test]
async fn duplicate_registration_keeps_one_row() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    client.register("alice", "pw1").await;
    let resp = client.register("alice", "other").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/register");

    let page = body_text(client.get("/register").await).await;
    assert!(page.contains("Username already exists"));
    assert_eq!(app.count_users("alice").await, 1);

    // The original password still works.
    let resp = client.login("alice", "pw1").await;
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn wrong_password_never_opens_a_session() {
    let app = TestApp::spawn().await;
    let mut client = app.client();
    client.register("alice", "pw1").await;

    let resp = client.login("alice", "wrong").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(!client.has_session());

    let page = body_text(client.get("/login").await).await;
    assert!(page.contains("Invalid username or password"));

    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn unknown_user_gets_the_same_message() {
    let app = TestApp::spawn().await;
    let mut client = app.client();

    let resp = client.login("ghost", "pw").await;
    assert_eq!(location(&resp), "/login");
    assert!(!client.has_session());

    let page = body_text(client.get("/login").await).await;
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn users_cannot_update_each_others_entries() {
    let app = TestApp::spawn().await;

    let mut alice = app.client();
    alice.register("alice", "pw1").await;
    alice.login("alice", "pw1").await;
    alice
        .post_form("/add_password", &site("bank", "bank.com", "secret"))
        .await;

    let mut bob = app.client();
    bob.register("bob", "pw2").await;
    bob.login("bob", "pw2").await;

    let alice_id = app.user_id("alice").await;
    let before = app.storage.list_entries(alice_id).await.unwrap();
    assert_eq!(before.len(), 1);

    let uri = format!("/update_password/{}", before[0].id);
    let resp = bob.post_form(&uri, &site("pwned", "evil.com", "gotcha")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    assert_eq!(app.storage.list_entries(alice_id).await.unwrap(), before);

    let bob_page = body_text(bob.get("/dashboard").await).await;
    assert!(!bob_page.contains("bank.com"));
}

#[tokio::test]
async fn logout_requires_logging_in_again() {
    let app = TestApp::spawn().await;
    let mut client = app.client();
    client.register("alice", "pw1").await;
    client.login("alice", "pw1").await;
    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);

    let resp = client.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert!(!client.has_session());

    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let resp = client
        .post_form("/add_password", &site("example", "ex.com", "x"))
        .await;
    assert_eq!(location(&resp), "/login");
    let alice_id = app.user_id("alice").await;
    assert!(app.storage.list_entries(alice_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() {
    let app = TestApp::spawn().await;
    let mut client = app.client();
    client.register("alice", "pw1").await;
    client.cookies.insert("user_id".to_string(), "1".to_string());

    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn storage_failures_flash_and_return_to_the_form() {
    let app = TestApp::spawn().await;
    let mut client = app.client();
    client.register("alice", "pw1").await;
    client.login("alice", "pw1").await;
    assert!(client.has_session());

    app.storage.clear_schema().await.expect("failed to drop tables");

    let resp = client
        .post_form("/add_password", &site("example", "ex.com", "x"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    let resp = client
        .post_form("/update_password/1", &site("example", "ex.com", "y"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let page = body_text(client.get("/login").await).await;
    assert!(page.contains("Database error occurred. Please try again later."));

    let resp = client.login("alice", "pw1").await;
    assert_eq!(location(&resp), "/login");
    let page = body_text(client.get("/login").await).await;
    assert!(page.contains("Database error occurred. Please try again later."));
    assert!(!page.contains("Invalid username or password"));

    let resp = client.register("bob", "pw2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/register");
    let page = body_text(client.get("/register").await).await;
    assert!(page.contains("Database error occurred. Please try again later."));
    assert!(!page.contains("Username already exists"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_logins_both_succeed() {
    let app = TestApp::spawn().await;
    let mut alice = app.client();
    let mut bob = app.client();
    alice.register("alice", "pw1").await;
    bob.register("bob", "pw2").await;

    let (a, b) = tokio::join!(alice.login("alice", "pw1"), bob.login("bob", "pw2"));
    assert_eq!(location(&a), "/dashboard");
    assert_eq!(location(&b), "/dashboard");
    assert!(alice.has_session());
    assert!(bob.has_session());

    let (a, b) = tokio::join!(alice.get("/dashboard"), bob.get("/dashboard"));
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
}
