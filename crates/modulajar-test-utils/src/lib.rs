//! Shared test utilities for modulajar integration tests.
//!
//! - [`sample_input`] / [`minimal_input`]: ready-made form records
//! - [`ScriptedGenerator`]: a [`Generator`] that replays queued outcomes and
//!   records every prompt it was given
//! - [`StubGemini`]: an HTTP server on an ephemeral port that answers
//!   `generateContent` with a canned status and body

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use serde_json::{Value, json};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use modulajar_core::generation::{GenerationError, Generator};
use modulajar_core::input::{Grade, ModuleInput, ProfileDimension, TeachingModel};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The smallest record that passes validation.
///
/// School "SMPN 3 Pakuhaji", teacher "Budi", principal "Siti", subject
/// "Matematika", core topic "Persamaan Linear", DPL [Kreativitas], PBL.
pub fn minimal_input() -> ModuleInput {
    let mut input = ModuleInput {
        school_name: "SMPN 3 Pakuhaji".into(),
        teacher_name: "Budi".into(),
        principal_name: "Siti".into(),
        subject: "Matematika".into(),
        core_topic: "Persamaan Linear".into(),
        teaching_model: TeachingModel::ProblemBased,
        ..ModuleInput::default()
    };
    input.selected_dpl.insert(ProfileDimension::Creativity);
    input
}

/// A fully populated record, NIPs and optional fields included.
pub fn sample_input() -> ModuleInput {
    let mut input = ModuleInput {
        school_name: "SMPN 3 Pakuhaji".into(),
        teacher_name: "Budi Santoso, S.Pd.".into(),
        teacher_nip: "198703122010011002".into(),
        principal_name: "Dr. Siti Aminah, M.Pd.".into(),
        principal_nip: "197501052000032001".into(),
        grade: Grade::VIII,
        subject: "Matematika".into(),
        core_topic: "Persamaan Linear Satu Variabel".into(),
        sub_topic: "Menyelesaikan PLSV".into(),
        duration: "2 x 40 Menit".into(),
        meeting_count: "2 Pertemuan".into(),
        teaching_model: TeachingModel::ProblemBased,
        ..ModuleInput::default()
    };
    for dim in [
        ProfileDimension::CriticalReasoning,
        ProfileDimension::Creativity,
        ProfileDimension::Collaboration,
    ] {
        input.selected_dpl.insert(dim);
    }
    input
}

/// Generated Markdown that keeps personnel out of section A and signs off in
/// a borderless two-column table.
pub fn sample_module(input: &ModuleInput) -> String {
    format!(
        "# MODUL AJAR {subject}\n\n\
         ## A. Identitas Modul\n\n\
         | Komponen | Keterangan |\n|---|---|\n\
         | Satuan Pendidikan | {school} |\n\
         | Materi Pokok | {topic} |\n\n\
         ## J. Langkah-Langkah Pembelajaran\n\n\
         Kegiatan inti menerapkan sintaks {model}.\n\n\
         ## P. Tanda Tangan\n\n\
         | Mengetahui, Kepala Sekolah | Guru Mata Pelajaran |\n|---|---|\n\
         | {principal} | {teacher} |\n\
         | NIP. {principal_nip} | NIP. {teacher_nip} |\n",
        subject = input.subject,
        school = input.school_name,
        topic = input.core_topic,
        model = input.teaching_model,
        principal = input.principal_name,
        teacher = input.teacher_name,
        principal_nip = input.principal_nip,
        teacher_nip = input.teacher_nip,
    )
}

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

/// [`Generator`] that pops one queued outcome per call.
///
/// An exhausted queue answers [`GenerationError::EmptyResponse`]. A gated
/// generator parks every call until [`ScriptedGenerator::release`].
#[derive(Default)]
pub struct ScriptedGenerator {
    outcomes: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Notify>,
}

impl ScriptedGenerator {
    pub fn new(outcomes: impl IntoIterator<Item = Result<String, GenerationError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answer the first call with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([Ok(text.into())])
    }

    /// Like [`ScriptedGenerator::new`], but each call waits for a release.
    pub fn gated(outcomes: impl IntoIterator<Item = Result<String, GenerationError>>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new(outcomes)
        }
    }

    /// Let one parked (or the next) call through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_owned());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// Stub Gemini endpoint
// ---------------------------------------------------------------------------

/// One request seen by [`StubGemini`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local stand-in for the `generateContent` endpoint.
///
/// Every POST, whatever the path, is captured and answered with the same
/// status and JSON body. The server task is aborted on drop.
pub struct StubGemini {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubGemini {
    /// Start a stub answering `status` with `reply`.
    pub async fn start(status: u16, reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("valid status code"),
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(capture).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Start a stub returning one candidate with `text`.
    pub async fn replying(text: &str) -> Self {
        Self::start(200, candidate_response(text)).await
    }

    /// API root to hand to `GeneratorConfig::with_endpoint`.
    pub fn endpoint(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

impl Drop for StubGemini {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A `generateContent` response body carrying a single text candidate.
pub fn candidate_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 512, "candidatesTokenCount": 128 }
    })
}

async fn capture(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let captured = CapturedRequest {
        path: uri.path().to_owned(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    state
        .requests
        .lock()
        .expect("requests lock poisoned")
        .push(captured);
    (state.status, Json(state.reply))
}
