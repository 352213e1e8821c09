#![allow(dead_code)]

use std::sync::Mutex;
use async_trait::async_trait;
use notas::config::ConnectionConfig;
use notas::error::ApiError;
use notas::models::{GradeRecord, GradeUpdate, GradeValue, NewGrade, RecordId, RemoteGrade};
use notas::utils::api::GradesApi;
use notas::utils::prompt::Prompter;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(RecordId),
    Create(NewGrade),
    Update(RecordId, GradeUpdate),
    Delete(RecordId),
}

/// In-memory grades collection that records every call it receives.
#[derive(Default)]
pub struct FakeApi {
    pub records: Mutex<Vec<GradeRecord>>,
    pub calls: Mutex<Vec<Call>>,
    pub keys: Mutex<Vec<Option<String>>>,
    pub fail_list: Mutex<Option<u16>>,
    pub fail_mutations: Mutex<Option<(u16, String)>>,
    pub unreachable: Mutex<Option<String>>,
    next_id: Mutex<u64>,
}

impl FakeApi {
    pub fn with_records(records: Vec<GradeRecord>) -> Self {
        let fake = FakeApi::default();
        *fake.next_id.lock().unwrap() = records.len() as u64;
        *fake.records.lock().unwrap() = records;
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls().iter().filter(|call| **call == Call::List).count()
    }

    pub fn fail_list_with(&self, status: u16) {
        *self.fail_list.lock().unwrap() = Some(status);
    }

    pub fn fail_mutations_with(&self, status: u16, message: &str) {
        *self.fail_mutations.lock().unwrap() = Some((status, message.to_string()));
    }

    // Every request fails before reaching the server, with `message` as the
    // transport error text.
    pub fn go_offline(&self, message: &str) {
        *self.unreachable.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, call: Call, config: &ConnectionConfig) {
        self.calls.lock().unwrap().push(call);
        self.keys.lock().unwrap().push(config.api_key().map(str::to_string));
    }

    fn reachable(&self) -> Result<(), ApiError> {
        match self.unreachable.lock().unwrap().clone() {
            Some(message) => Err(ApiError::Transport(message)),
            None => Ok(()),
        }
    }

    fn mutation_failure(&self) -> Result<(), ApiError> {
        self.reachable()?;
        match self.fail_mutations.lock().unwrap().clone() {
            Some((status, message)) => Err(ApiError::Status { status, message }),
            None => Ok(()),
        }
    }
}

pub fn record(id: &str, class: &str, student: &str, grade: i64) -> GradeRecord {
    GradeRecord {
        id: RecordId::new(id),
        class: class.to_string(),
        student: student.to_string(),
        grade: RemoteGrade::from(grade),
        date: None,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl GradesApi for FakeApi {
    async fn list(&self, config: &ConnectionConfig) -> Result<Vec<GradeRecord>, ApiError> {
        self.record(Call::List, config);
        self.reachable()?;
        if let Some(status) = *self.fail_list.lock().unwrap() {
            return Err(ApiError::Status {
                status,
                message: format!("Error HTTP: {}", status),
            });
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get(&self, config: &ConnectionConfig, id: &RecordId) -> Result<GradeRecord, ApiError> {
        self.record(Call::Get(id.clone()), config);
        self.reachable()?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| &record.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("Elemento con ID {} no encontrado.", id),
            })
    }

    async fn create(&self, config: &ConnectionConfig, grade: &NewGrade) -> Result<(), ApiError> {
        self.record(Call::Create(grade.clone()), config);
        self.mutation_failure()?;

        let Some(value) = grade.grade.as_integer() else {
            return Err(ApiError::Status {
                status: 400,
                message: "invalid grade".to_string(),
            });
        };

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.records
            .lock()
            .unwrap()
            .push(record(&next_id.to_string(), &grade.class, &grade.student, value));
        Ok(())
    }

    async fn update(
        &self,
        config: &ConnectionConfig,
        id: &RecordId,
        changes: &GradeUpdate,
    ) -> Result<(), ApiError> {
        self.record(Call::Update(id.clone(), changes.clone()), config);
        self.mutation_failure()?;

        let mut records = self.records.lock().unwrap();
        let Some(existing) = records.iter_mut().find(|record| &record.id == id) else {
            return Err(ApiError::Status {
                status: 404,
                message: format!("Elemento con ID {} no encontrado.", id),
            });
        };
        if let Some(class) = &changes.class {
            existing.class = class.clone();
        }
        if let Some(student) = &changes.student {
            existing.student = student.clone();
        }
        if let Some(GradeValue::Integer(value)) = changes.grade {
            existing.grade = RemoteGrade::from(value);
        }
        Ok(())
    }

    async fn delete(&self, config: &ConnectionConfig, id: &RecordId) -> Result<(), ApiError> {
        self.record(Call::Delete(id.clone()), config);
        self.mutation_failure()?;
        self.records.lock().unwrap().retain(|record| &record.id != id);
        Ok(())
    }
}

/// Prompter that answers every confirmation with `answer` and keeps a log.
pub struct RecordingPrompter {
    pub answer: bool,
    pub alerts: Mutex<Vec<String>>,
    pub questions: Mutex<Vec<String>>,
}

impl RecordingPrompter {
    pub fn answering(answer: bool) -> Self {
        RecordingPrompter {
            answer,
            alerts: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for RecordingPrompter {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer
    }
}
