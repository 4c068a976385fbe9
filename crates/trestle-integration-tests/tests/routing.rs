//! Views, parts and the built-in text surfaces.

mod common;

use common::WorkbenchHarness;
use serde_json::Value;
use trestle_capabilities::Manifest;
use trestle_capabilities::enrich::MESSAGE_PARAM;
use trestle_core::{Params, Qualifier};
use trestle_intents::ClientError;
use trestle_kernel::initializers::{TEXT_MESSAGE_BOX_COMPONENT, TEXT_NOTIFICATION_COMPONENT};
use trestle_kernel::{NotificationOptions, OpenOptions};
use trestle_surfaces::{NotificationDuration, OutletTarget};
use trestle_test::{test_application, test_view_capability};

#[tokio::test]
async fn test_view_title_is_substituted() {
    let harness = WorkbenchHarness::start(vec![test_application(
        Manifest::new().with_capability(test_view_capability("person", "person/:id").public()),
    )])
    .await;

    let mut params = Params::new();
    params.insert("id".into(), Value::from("42"));
    let session = harness
        .workbench
        .router()
        .open_view(
            Qualifier::new().with("entity", "person"),
            params,
            harness.workbench.host_app(),
        )
        .unwrap();

    let handle = harness.shell.wait_for_presented(1).await.remove(0);
    assert_eq!(handle.properties().title.as_deref(), Some("View 42"));
    assert!(matches!(
        &harness.shell.navigations()[0].1,
        OutletTarget::Remote { url, .. } if url.ends_with("person/42")
    ));

    handle.close(Some(Value::from(true)));
    assert_eq!(session.await.unwrap().unwrap(), Some(Value::from(true)));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_unknown_view_fails_synchronously() {
    let harness = WorkbenchHarness::start(Vec::new()).await;

    let result = harness.workbench.router().open_view(
        Qualifier::new().with("entity", "nobody"),
        Params::new(),
        harness.workbench.host_app(),
    );

    assert!(result.is_err());
    assert!(harness.shell.presented().is_empty());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_text_message_box_uses_host_route() {
    let harness = WorkbenchHarness::start(Vec::new()).await;

    let pending = tokio::spawn({
        let services = harness.services();
        async move {
            services
                .open_message_box("Saved.", OpenOptions::default())
                .await
        }
    });

    let handle = harness.shell.wait_for_presented(1).await.remove(0);
    assert_eq!(handle.params()[MESSAGE_PARAM], Value::from("Saved."));
    assert!(matches!(
        &harness.shell.navigations()[0].1,
        OutletTarget::Host { route } if route.component == TEXT_MESSAGE_BOX_COMPONENT
    ));

    handle.close(Some(Value::from("ok")));
    assert_eq!(pending.await.unwrap().unwrap(), Some(Value::from("ok")));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_text_notification_closes_after_duration() {
    let harness = WorkbenchHarness::start(Vec::new()).await;

    let result = harness
        .services()
        .show_notification(
            "Copied",
            NotificationOptions {
                duration: Some(NotificationDuration::Millis(20)),
                ..NotificationOptions::default()
            },
        )
        .await;

    assert!(result.is_ok());
    assert!(matches!(
        &harness.shell.navigations()[0].1,
        OutletTarget::Host { route } if route.component == TEXT_NOTIFICATION_COMPONENT
    ));
    assert!(harness.shell.presented()[0].is_closed());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_application_cannot_open_private_capability_of_another() {
    let harness = WorkbenchHarness::start(vec![test_application(
        Manifest::new().with_capability(trestle_test::test_dialog_capability("secret", "secret")),
    )])
    .await;

    let result = harness
        .services()
        .open_dialog(trestle_test::test_qualifier("secret"), OpenOptions::default())
        .await;

    assert!(matches!(result, Err(ClientError::Rejected(_))));
    assert!(harness.shell.presented().is_empty());
    harness.shutdown().await;
}
