//! End-to-end intent flows: issue an intent, open a surface, close it and
//! receive the result.

mod common;

use common::WorkbenchHarness;
use serde_json::Value;
use trestle_capabilities::Manifest;
use trestle_config::Config;
use trestle_intents::ClientError;
use trestle_kernel::OpenOptions;
use trestle_surfaces::OutletTarget;
use trestle_test::{
    MockShell, TEST_BASE_URL, test_application, test_dialog_capability,
    test_message_box_capability, test_qualifier,
};

#[tokio::test]
async fn test_message_box_without_capability_rejects() {
    let harness = WorkbenchHarness::start(Vec::new()).await;

    let err = harness
        .services()
        .open_message_box(test_qualifier("x"), OpenOptions::default())
        .await
        .unwrap_err();

    match err {
        ClientError::Rejected(message) => assert!(message.contains("messagebox")),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(harness.shell.presented().is_empty());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_message_box_result_after_capability_registered() {
    let harness = WorkbenchHarness::start(Vec::new()).await;
    let services = harness.services();

    assert!(
        services
            .open_message_box(test_qualifier("x"), OpenOptions::default())
            .await
            .is_err()
    );

    let report = harness
        .workbench
        .registry()
        .register_application(test_application(
            Manifest::new().with_capability(test_message_box_capability("x", "x").public()),
        ))
        .unwrap();
    assert!(report.rejected.is_empty());

    let pending = tokio::spawn({
        let services = services.clone();
        async move {
            services
                .open_message_box(test_qualifier("x"), OpenOptions::default())
                .await
        }
    });

    let handles = harness.shell.wait_for_presented(1).await;
    assert_eq!(handles.len(), 1);
    let navigations = harness.shell.navigations();
    assert!(matches!(
        &navigations[0].1,
        OutletTarget::Remote { url, .. } if *url == format!("{TEST_BASE_URL}x")
    ));

    assert!(handles[0].close(Some(Value::from("ok"))));
    let result = pending.await.unwrap().unwrap();
    assert_eq!(result, Some(Value::from("ok")));

    assert_eq!(harness.shell.wait_for_cleared(1).await.len(), 1);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_dialog_without_capability_opens_nothing() {
    let harness = WorkbenchHarness::start(Vec::new()).await;

    let result = harness
        .services()
        .open_dialog(test_qualifier("missing"), OpenOptions::default())
        .await;

    assert!(matches!(result, Err(ClientError::Rejected(_))));
    assert!(harness.shell.presented().is_empty());
    assert!(harness.shell.navigations().is_empty());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_dialog_params_reach_path_and_context() {
    let harness = WorkbenchHarness::start(vec![test_application(
        Manifest::new().with_capability(
            test_dialog_capability("contact", "contact/:id")
                .with_param(trestle_core::ParamDescriptor::required("id"))
                .public(),
        ),
    )])
    .await;

    let pending = tokio::spawn({
        let services = harness.services();
        async move {
            services
                .open_dialog(
                    test_qualifier("contact"),
                    OpenOptions::default().with_param("id", 7),
                )
                .await
        }
    });

    let handle = harness.shell.wait_for_presented(1).await.remove(0);
    assert_eq!(handle.params()["id"], Value::from(7));
    assert!(matches!(
        &harness.shell.navigations()[0].1,
        OutletTarget::Remote { url, .. } if url.ends_with("contact/7")
    ));

    handle.close(None);
    assert_eq!(pending.await.unwrap().unwrap(), None);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_rejected_navigation_closes_with_error() {
    let harness = WorkbenchHarness::start_with(
        MockShell::new().rejecting("contact"),
        Config::default(),
        Manifest::new(),
        vec![test_application(
            Manifest::new().with_capability(test_dialog_capability("contact", "contact").public()),
        )],
    )
    .await;

    let result = harness
        .services()
        .open_dialog(test_qualifier("contact"), OpenOptions::default())
        .await;

    assert!(matches!(result, Err(ClientError::Rejected(_))));
    assert_eq!(harness.shell.wait_for_cleared(1).await.len(), 1);
    assert!(harness.shell.presented()[0].is_closed());
    harness.shutdown().await;
}

#[tokio::test]
async fn test_close_with_error_rejects_caller() {
    let harness = WorkbenchHarness::start(vec![test_application(
        Manifest::new().with_capability(test_dialog_capability("contact", "contact").public()),
    )])
    .await;

    let pending = tokio::spawn({
        let services = harness.services();
        async move {
            services
                .open_dialog(test_qualifier("contact"), OpenOptions::default())
                .await
        }
    });

    let handle = harness.shell.wait_for_presented(1).await.remove(0);
    assert!(handle.close_with_error("cancelled by user"));
    assert!(!handle.close(Some(Value::from("late"))));

    match pending.await.unwrap() {
        Err(ClientError::Rejected(message)) => assert!(message.contains("cancelled by user")),
        other => panic!("expected rejection, got {other:?}"),
    }
    harness.shutdown().await;
}

#[tokio::test]
async fn test_burst_of_intents_all_get_replies() {
    let harness = WorkbenchHarness::start(Vec::new()).await;
    let burst = harness
        .workbench
        .bus()
        .capacity()
        .saturating_mul(2)
        .max(400);

    let callers: Vec<_> = (0..burst)
        .map(|_| {
            let services = harness.services();
            tokio::spawn(async move {
                tokio::time::timeout(
                    std::time::Duration::from_secs(10),
                    services.open_dialog(test_qualifier("missing"), OpenOptions::default()),
                )
                .await
            })
        })
        .collect();

    let mut rejected = 0usize;
    for caller in callers {
        let reply = caller.await.unwrap().expect("caller left without a reply");
        assert!(matches!(reply, Err(ClientError::Rejected(_))));
        rejected = rejected.saturating_add(1);
    }
    assert_eq!(rejected, burst);
    harness.shutdown().await;
}
