// What the client writes to the logs with body logging switched on

use codejudge_core::LoginForm;
use codejudge_sdk::{JudgeClient, MemoryTokenStore, SdkConfig, TokenStore};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "SECRET-TOKEN-XYZ";
const PASSWORD: &str = "hunter2-PW";

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_logs_keep_credentials_out_of_release_builds() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": TOKEN})))
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let config = SdkConfig::new(format!("{}/api/v1/", server.uri())).with_logging(true);
    let client = JudgeClient::new(config, Arc::clone(&tokens)).unwrap();

    client
        .auth()
        .login(&LoginForm::new("ada@example.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(tokens.get().unwrap().as_deref(), Some(TOKEN));

    let output = logs.contents();
    assert!(output.contains("Request body"), "request body not logged:\n{}", output);
    assert!(output.contains("Response body"), "response body not logged:\n{}", output);
    assert!(output.contains("ada@example.com"));

    if !cfg!(debug_assertions) {
        assert!(!output.contains(TOKEN), "token in release logs:\n{}", output);
        assert!(!output.contains(PASSWORD), "password in release logs:\n{}", output);
    }
}
