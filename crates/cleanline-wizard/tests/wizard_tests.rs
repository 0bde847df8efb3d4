/*
[INPUT]:  Wizards with gated, slow and failing commits
[OUTPUT]: Verification of the in-flight guard, timeout and cancellation
[POS]:    Integration tests - wizard transition rules
[UPDATE]: When commit policy or transition rules change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use cleanline_wizard::validate::required;
use cleanline_wizard::{
    CommitError, Fields, GuardedWizard, Position, SimulatedCommit, Transition, WizardError,
    WizardStep,
};
use common::{GatedCommit, Step, wait_in_flight};
use tokio_test::assert_ok;

fn gated_wizard(gate: Arc<GatedCommit>) -> Arc<GuardedWizard<Step>> {
    let wizard = GuardedWizard::new(
        vec![
            WizardStep::new(Step::One, "One")
                .validate(required("name", "Name"))
                .commit(gate),
            WizardStep::new(Step::Two, "Two"),
            WizardStep::new(Step::Three, "Three"),
        ],
        Fields::new().with("name", "Ana"),
    );
    Arc::new(assert_ok!(wizard))
}

#[tokio::test]
async fn test_advance_is_noop_while_in_flight() {
    let gate = GatedCommit::new();
    let wizard = gated_wizard(gate.clone());

    let first = tokio::spawn({
        let wizard = wizard.clone();
        async move { wizard.request_advance().await }
    });
    wait_in_flight(&wizard).await;

    for _ in 0..3 {
        assert_eq!(
            assert_ok!(wizard.request_advance().await),
            Transition::Unchanged
        );
        assert_eq!(wizard.request_back().await, Transition::Unchanged);
        assert_eq!(
            assert_ok!(wizard.resend_commit().await),
            Transition::Unchanged
        );
    }
    assert_eq!(wizard.position().await, Position::Step(Step::One));
    assert_eq!(gate.calls(), 1);

    gate.release();
    let transition = assert_ok!(assert_ok!(first.await));
    assert_eq!(
        transition,
        Transition::Advanced {
            from: Step::One,
            to: Step::Two
        }
    );
    let state = wizard.state().await;
    assert_eq!(state.position, Position::Step(Step::Two));
    assert!(!state.in_flight);
}

#[tokio::test]
async fn test_cancel_aborts_pending_commit() {
    let gate = GatedCommit::new();
    let wizard = gated_wizard(gate.clone());

    let pending = tokio::spawn({
        let wizard = wizard.clone();
        async move { wizard.request_advance().await }
    });
    wait_in_flight(&wizard).await;

    wizard.cancel().await;
    let result = assert_ok!(pending.await);
    assert_eq!(result, Err(WizardError::Commit(CommitError::Cancelled)));

    let state = wizard.state().await;
    assert_eq!(state.position, Position::Cancelled);
    assert!(!state.in_flight);
}

#[tokio::test]
async fn test_reset_during_commit_discards_result() {
    let gate = GatedCommit::new();
    let wizard = gated_wizard(gate.clone());
    let initial = wizard.state().await;

    let pending = tokio::spawn({
        let wizard = wizard.clone();
        async move { wizard.request_advance().await }
    });
    wait_in_flight(&wizard).await;

    wizard.reset().await;
    gate.release();
    assert!(assert_ok!(pending.await).is_err());
    assert_eq!(wizard.state().await, initial);
}

#[tokio::test(start_paused = true)]
async fn test_commit_timeout_is_recoverable() {
    let wizard = GuardedWizard::new(
        vec![
            WizardStep::new(Step::One, "One")
                .commit(Arc::new(SimulatedCommit::new(Duration::from_secs(60)))),
            WizardStep::new(Step::Two, "Two"),
        ],
        Fields::new(),
    )
    .unwrap()
    .with_commit_timeout(Duration::from_secs(5));

    let err = wizard.request_advance().await.unwrap_err();
    assert_eq!(
        err,
        WizardError::Commit(CommitError::Timeout {
            after: Duration::from_secs(5)
        })
    );

    let state = wizard.state().await;
    assert_eq!(state.position, Position::Step(Step::One));
    assert!(!state.in_flight);
    assert_eq!(state.error.as_deref(), Some("Request timed out after 5s"));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_advance_still_settles() {
    let wizard = GuardedWizard::new(
        vec![
            WizardStep::new(Step::One, "One")
                .commit(Arc::new(SimulatedCommit::new(Duration::from_secs(2)))),
            WizardStep::new(Step::Two, "Two"),
        ],
        Fields::new(),
    )
    .unwrap();

    let abandoned =
        tokio::time::timeout(Duration::from_secs(1), wizard.request_advance()).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_secs(60)).await;
    let state = wizard.state().await;
    assert!(!state.in_flight);
    assert_eq!(state.position, Position::Step(Step::Two));
    assert_eq!(
        wizard.request_back().await,
        Transition::Retreated {
            from: Step::Two,
            to: Step::One
        }
    );
}

#[tokio::test]
async fn test_commit_failure_keeps_step_and_retry_succeeds() {
    let wizard = GuardedWizard::new(
        vec![
            WizardStep::new(Step::One, "One")
                .commit(Arc::new(SimulatedCommit::failing(Duration::ZERO, "Server busy"))),
            WizardStep::new(Step::Two, "Two"),
        ],
        Fields::new(),
    )
    .unwrap();

    assert!(wizard.request_advance().await.is_err());
    assert_eq!(wizard.position().await, Position::Step(Step::One));
    assert_eq!(wizard.error().await.as_deref(), Some("Server busy"));
}

#[tokio::test]
async fn test_back_from_every_index() {
    let wizard = GuardedWizard::new(
        vec![
            WizardStep::new(Step::One, "One"),
            WizardStep::new(Step::Two, "Two"),
            WizardStep::new(Step::Three, "Three"),
        ],
        Fields::new(),
    )
    .unwrap();
    let order = [Step::One, Step::Two, Step::Three];

    for target in 0..order.len() {
        wizard.reset().await;
        for _ in 0..target {
            wizard.request_advance().await.unwrap();
        }
        assert_eq!(wizard.position().await, Position::Step(order[target]));

        let transition = wizard.request_back().await;
        if target == 0 {
            assert_eq!(transition, Transition::Unchanged);
            assert_eq!(wizard.position().await, Position::Step(Step::One));
        } else {
            assert_eq!(
                transition,
                Transition::Retreated {
                    from: order[target],
                    to: order[target - 1]
                }
            );
        }
    }
}
