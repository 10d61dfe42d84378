//! Icon font loading: one insertion per URL, at most one fallback.

mod common;

use coco_desk::script_loader::ScriptSource;
use common::TestDesk;

const ENDPOINT: &str = "https://coco.example.com";
const REMOTE: &str = "https://coco.example.com/assets/fonts/icons/iconfont.js";
const LOCAL: &str = "/assets/fonts/icons/iconfont.js";

#[tokio::test]
async fn test_same_url_inserted_once() {
    let desk = TestDesk::new();

    let first = desk.app.load_iconfont(Some(ENDPOINT)).await.unwrap();
    let second = desk.app.load_iconfont(Some(ENDPOINT)).await.unwrap();

    assert_eq!(first, ScriptSource::Remote(REMOTE.to_string()));
    assert_eq!(second, ScriptSource::AlreadyLoaded(REMOTE.to_string()));
    assert_eq!(desk.resources.inserted(), vec![REMOTE.to_string()]);
}

#[tokio::test]
async fn test_remote_failure_falls_back_once() {
    let desk = TestDesk::new();
    desk.resources.fail_url(REMOTE);

    let source = desk.app.load_iconfont(Some(ENDPOINT)).await.unwrap();
    assert_eq!(source, ScriptSource::Fallback(LOCAL.to_string()));
    assert_eq!(
        desk.resources.inserted(),
        vec![REMOTE.to_string(), LOCAL.to_string()]
    );

    desk.app.load_iconfont(Some(ENDPOINT)).await.unwrap();
    assert_eq!(desk.resources.inserted().len(), 2);
}

#[tokio::test]
async fn test_double_failure_stops_after_fallback() {
    let desk = TestDesk::new();
    desk.resources.fail_url(REMOTE);
    desk.resources.fail_url(LOCAL);

    assert!(desk.app.load_iconfont(Some(ENDPOINT)).await.is_err());
    assert_eq!(desk.resources.inserted().len(), 2);
    // Resource failures never reach the user-facing list
    assert!(desk.app.notifications().is_empty());

    // A failed bundle stays failed rather than reading as loaded
    assert!(desk.app.load_iconfont(Some(ENDPOINT)).await.is_err());
    assert!(desk.app.load_iconfont(None).await.is_err());
    assert_eq!(desk.resources.inserted().len(), 2);
}

#[tokio::test]
async fn test_no_endpoint_uses_bundled_copy() {
    let desk = TestDesk::new();
    let source = desk.app.load_iconfont(None).await.unwrap();
    assert_eq!(source, ScriptSource::Fallback(LOCAL.to_string()));
    assert_eq!(desk.resources.inserted(), vec![LOCAL.to_string()]);
}
