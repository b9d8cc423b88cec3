use moon_console::{
    api::{
        ApiClient, ApiError, Backend, CaptchaRequest, DEFAULT_TIMEOUT, ListQuery, SubmitKind,
        captcha, list_teams, login, source_options, submit_record,
    },
    form::OptionSource,
    i18n::{Locale, LocaleHandle},
    records::LoginForm,
    session::{Session, SessionStore},
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

struct Fixture {
    server: MockServer,
    client: ApiClient,
    session: Session,
    locale: LocaleHandle,
    _dir: TempDir,
}

async fn fixture() -> Fixture {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(SessionStore::new(dir.path()));
    let locale = LocaleHandle::new(Locale::EnUs);
    let client = ApiClient::new(
        format!("{}/", server.uri()),
        session.clone(),
        locale.clone(),
        DEFAULT_TIMEOUT,
    )
    .unwrap();
    Fixture {
        server,
        client,
        session,
        locale,
        _dir: dir,
    }
}

fn team_page() -> serde_json::Value {
    json!({
        "list": [{"id": 1, "name": "Ops", "logo": "", "remark": "", "status": 1}],
        "pagination": {"pageNum": 1, "pageSize": 10, "total": 1}
    })
}

#[tokio::test]
async fn list_calls_carry_token_and_locale() {
    let f = fixture().await;
    f.session.sign_in("t-1");
    Mock::given(method("POST"))
        .and(path("/v1/team/list"))
        .and(header("authorization", "Bearer t-1"))
        .and(header("accept-language", "en-US"))
        .and(body_partial_json(json!({"keyword": "ops", "pagination": {"pageNum": 1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(team_page()))
        .expect(1)
        .mount(&f.server)
        .await;

    let mut query = ListQuery::default();
    query.keyword = "ops".into();
    let reply = list_teams(&f.client, &query).await.unwrap();
    assert_eq!(reply.list.len(), 1);
    assert_eq!(reply.list[0].name, "Ops");
}

#[tokio::test]
async fn locale_switch_applies_to_the_next_call() {
    let f = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/team/list"))
        .and(header("accept-language", "zh-CN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(team_page()))
        .expect(1)
        .mount(&f.server)
        .await;

    f.locale.set(Locale::ZhCn);
    list_teams(&f.client, &ListQuery::default()).await.unwrap();
}

#[tokio::test]
async fn error_bodies_become_application_errors() {
    let f = fixture().await;
    Mock::given(path("/v1/team/create"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "reason": "ALREADY_EXISTS",
            "message": "team name taken",
            "metadata": {"name": "duplicate name"}
        })))
        .mount(&f.server)
        .await;
    Mock::given(path("/v1/team/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"reason": "UNAUTHORIZED"})))
        .mount(&f.server)
        .await;
    Mock::given(path("/v1/datasource/list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&f.server)
        .await;

    let err = submit_record(&f.client, "/v1/team", SubmitKind::Create, json!({"name": "Ops"}))
        .await
        .unwrap_err();
    let body = err.response().expect("structured error");
    assert_eq!(body.code, 400);
    assert!(body.has_field_errors());
    assert_eq!(body.metadata["name"], "duplicate name");

    let err = list_teams(&f.client, &ListQuery::default()).await.unwrap_err();
    assert_eq!(err.response().map(|body| body.code), Some(401));

    let err = moon_console::api::list_datasources(&f.client, &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn updates_are_put_under_the_record_id() {
    let f = fixture().await;
    Mock::given(method("PUT"))
        .and(path("/v1/strategy/group/7"))
        .and(body_partial_json(json!({"name": "core"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&f.server)
        .await;

    let reply = submit_record(
        &f.client,
        "/v1/strategy/group",
        SubmitKind::Update(7),
        json!({"id": 7, "name": "core"}),
    )
    .await
    .unwrap();
    assert!(reply.is_null());
}

#[tokio::test]
async fn login_hashes_the_password() {
    let f = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/captcha"))
        .and(body_partial_json(json!({"captchaType": 1, "theme": "dark"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "c-1", "captcha": "ab12"})),
        )
        .mount(&f.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(body_partial_json(json!({
            "username": "admin",
            "password": "5ebe2294ecd0e0f08eab7690d2a6ee69",
            "captcha": {"code": "ab12", "id": "c-1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-9"})))
        .expect(1)
        .mount(&f.server)
        .await;

    let challenge = captcha(&f.client, &CaptchaRequest::default()).await.unwrap();
    let form = LoginForm {
        username: "admin".into(),
        password: "secret".into(),
        captcha: "ab12".into(),
        remember: false,
    };
    let reply = login(&f.client, &form.to_request(&challenge.id)).await.unwrap();
    assert_eq!(reply.token, "t-9");
}

#[tokio::test]
async fn backend_trait_object_is_usable() {
    let f = fixture().await;
    Mock::given(path("/v1/team/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(team_page()))
        .mount(&f.server)
        .await;
    let backend: &dyn Backend = &f.client;
    let reply = list_teams(backend, &ListQuery::default()).await.unwrap();
    assert_eq!(reply.pagination.total, 1);
}

#[tokio::test]
async fn category_selects_load_the_group_category_dict() {
    let f = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/dict/select/list"))
        .and(body_partial_json(json!({"dictType": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{"value": 11, "label": "host"}, {"value": 12, "label": "db", "disabled": true}],
            "pagination": {"total": 2}
        })))
        .expect(1)
        .mount(&f.server)
        .await;

    let options = source_options(&f.client, OptionSource::Categories).await.unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "host");
    assert!(options[1].disabled);
}
