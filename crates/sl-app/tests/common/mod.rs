#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;

use sl_app::usecases::{AnalysisWorkflow, NavigationContext, NavigationController, SubmitOnboarding};
use sl_core::analysis::{
    Analysis, AnalysisStatus, AnalysisStatusReport, MetricLevel, SkinMetric, UploadReceipt,
    WorkflowProgress,
};
use sl_core::auth::{AuthSnapshot, UserProfile};
use sl_core::ids::AnalysisId;
use sl_core::navigation::{Direction, ScreenState};
use sl_core::ports::tests::mock_ports::{MockAnalysisApi, MockCompressor, MockOnboardingApi};
use sl_core::ports::{ScreenPresenterPort, SessionProviderPort, WorkflowProgressPort};

/// Routes `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Session provider backed by a watch channel the test drives directly.
pub struct FakeSession {
    tx: watch::Sender<AuthSnapshot>,
    on_initialize: Mutex<Option<AuthSnapshot>>,
    after_refresh: Mutex<Option<AuthSnapshot>>,
    pub signed_out: AtomicBool,
    pub refreshes: AtomicUsize,
}

impl FakeSession {
    pub fn new(initial: AuthSnapshot) -> Arc<Self> {
        let (tx, _) = watch::channel(initial);
        Arc::new(Self {
            tx,
            on_initialize: Mutex::new(None),
            after_refresh: Mutex::new(None),
            signed_out: AtomicBool::new(false),
            refreshes: AtomicUsize::new(0),
        })
    }

    pub fn resolve_on_initialize(&self, snapshot: AuthSnapshot) {
        *self.on_initialize.lock().unwrap() = Some(snapshot);
    }

    pub fn resolve_on_refresh(&self, snapshot: AuthSnapshot) {
        *self.after_refresh.lock().unwrap() = Some(snapshot);
    }

    pub fn set(&self, snapshot: AuthSnapshot) {
        self.tx.send_replace(snapshot);
    }
}

#[async_trait]
impl SessionProviderPort for FakeSession {
    async fn initialize(&self) -> anyhow::Result<()> {
        let next = self.on_initialize.lock().unwrap().take();
        if let Some(snapshot) = next {
            self.set(snapshot);
        }
        Ok(())
    }

    fn current(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    async fn refresh_profile(&self) -> anyhow::Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let next = self.after_refresh.lock().unwrap().take();
        if let Some(snapshot) = next {
            self.set(snapshot);
        }
        Ok(())
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.signed_out.store(true, Ordering::SeqCst);
        self.set(AuthSnapshot::signed_out());
        Ok(())
    }
}

/// Presenter that records every swap and optionally "animates" for a while.
#[derive(Default)]
pub struct RecordingPresenter {
    pub animation: Option<Duration>,
    pub swaps: Mutex<Vec<(ScreenState, ScreenState, Direction)>>,
    pub progress: Mutex<Vec<WorkflowProgress>>,
}

impl RecordingPresenter {
    pub fn animated(animation: Duration) -> Self {
        Self {
            animation: Some(animation),
            ..Default::default()
        }
    }

    pub fn destinations(&self) -> Vec<ScreenState> {
        self.swaps.lock().unwrap().iter().map(|(_, to, _)| *to).collect()
    }
}

#[async_trait]
impl ScreenPresenterPort for RecordingPresenter {
    async fn present(&self, from: ScreenState, to: ScreenState, direction: Direction) {
        self.swaps.lock().unwrap().push((from, to, direction));
        if let Some(animation) = self.animation {
            tokio::time::sleep(animation).await;
        }
    }

    fn show_progress(&self, progress: WorkflowProgress) {
        self.progress.lock().unwrap().push(progress);
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub seen: Mutex<Vec<WorkflowProgress>>,
}

impl RecordingProgress {
    pub fn percents(&self) -> Vec<u8> {
        self.seen.lock().unwrap().iter().map(|p| p.percent).collect()
    }
}

impl WorkflowProgressPort for RecordingProgress {
    fn report(&self, progress: WorkflowProgress) {
        self.seen.lock().unwrap().push(progress);
    }
}

pub fn completed_profile() -> AuthSnapshot {
    AuthSnapshot::authenticated(Some(UserProfile::new("user-1", true)))
}

pub fn onboarding_profile() -> AuthSnapshot {
    AuthSnapshot::authenticated(Some(UserProfile::new("user-1", false)))
}

pub fn receipt(id: &str) -> UploadReceipt {
    UploadReceipt {
        analysis_id: AnalysisId::new(id),
        status: AnalysisStatus::Processing,
        task_id: Some(format!("task-{id}")),
        message: None,
    }
}

pub fn status(status: AnalysisStatus, progress: Option<f32>) -> AnalysisStatusReport {
    AnalysisStatusReport {
        status,
        progress,
        error_message: None,
    }
}

pub fn completed_analysis(id: &str, scores: &[(&str, f64, f64)]) -> Analysis {
    let metrics = scores
        .iter()
        .map(|(name, score, confidence)| {
            (
                name.to_string(),
                SkinMetric {
                    level: MetricLevel::Moderate,
                    score: *score,
                    confidence: *confidence,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();
    Analysis {
        id: AnalysisId::new(id),
        status: AnalysisStatus::Completed,
        skin_metrics: Some(metrics),
        error_message: None,
        model_version: Some("skin-v3.2".into()),
        created_at: Utc::now(),
    }
}

pub fn realistic_analysis(id: &str) -> Analysis {
    completed_analysis(
        id,
        &[
            ("acne", 0.31, 0.88),
            ("pores", 0.57, 0.81),
            ("redness", 0.12, 0.93),
        ],
    )
}

pub fn failing_compressor() -> MockCompressor {
    let mut compressor = MockCompressor::new();
    compressor
        .expect_compress()
        .returning(|_, _| Err(anyhow::anyhow!("compression unavailable")));
    compressor
}

/// Analysis API that uploads as `id` and completes on the first poll.
pub fn instant_api(id: &'static str) -> MockAnalysisApi {
    let mut api = MockAnalysisApi::new();
    api.expect_upload().returning(move |_, _| Ok(receipt(id)));
    api.expect_status()
        .returning(|_| Ok(status(AnalysisStatus::Completed, None)));
    api.expect_fetch()
        .returning(move |_| Ok(realistic_analysis(id)));
    api
}

pub struct Harness {
    pub controller: Arc<NavigationController>,
    pub session: Arc<FakeSession>,
    pub presenter: Arc<RecordingPresenter>,
}

pub fn build_controller(
    initial: ScreenState,
    session: Arc<FakeSession>,
    presenter: RecordingPresenter,
    api: MockAnalysisApi,
    onboarding_api: MockOnboardingApi,
) -> Harness {
    let presenter = Arc::new(presenter);
    let workflow = AnalysisWorkflow::new(Arc::new(api), Arc::new(failing_compressor()));
    let controller = NavigationController::new(
        NavigationContext::new(initial).arc(),
        session.clone(),
        presenter.clone(),
        Arc::new(workflow),
        Arc::new(SubmitOnboarding::new(Arc::new(onboarding_api))),
    );
    Harness {
        controller: Arc::new(controller),
        session,
        presenter,
    }
}
