//! Keeps the rendered grade list in step with the remote collection.
//!
//! Every mutation that succeeds is followed by a full reload of the list; a
//! failed one is reported to the user and leaves the list as it was.

use log::{error, info};
use crate::config::{ConfigSource, ConnectionConfig};
use crate::error::{ConfigMissing, SyncError};
use crate::models::{GradeForm, GradeRecord, GradeUpdate, RecordId};
use crate::utils::api::GradesApi;
use crate::utils::prompt::Prompter;
use crate::utils::view::GradeList;

const SAVE_ERROR_PREFIX: &str = "Error al guardar";
const DELETE_ERROR_PREFIX: &str = "Error al borrar";
const UPDATE_ERROR_PREFIX: &str = "Error al actualizar";
const SHOW_ERROR_PREFIX: &str = "Error al cargar la nota";

/// A user intent, independent of how the host delivered it.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load,
    Create(GradeForm),
    Delete(RecordId),
    Show(RecordId),
    Update(RecordId, GradeUpdate),
}

/// What a dispatched command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded(usize),
    Created,
    Deleted,
    Shown(GradeRecord),
    Updated,
}

pub struct GradeSync<A, C, P> {
    api: A,
    config: C,
    prompter: P,
    list: GradeList,
}

impl<A, C, P> GradeSync<A, C, P>
where
    A: GradesApi,
    C: ConfigSource,
    P: Prompter,
{
    pub fn new(api: A, config: C, prompter: P) -> Self {
        GradeSync {
            api,
            config,
            prompter,
            list: GradeList::new(),
        }
    }

    pub fn list(&self) -> &GradeList {
        &self.list
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    // Routes a user intent to the matching operation.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome, SyncError> {
        match command {
            Command::Load => self.refresh().await.map(Outcome::Loaded),
            Command::Create(mut form) => self.create(&mut form).await.map(|_| Outcome::Created),
            Command::Delete(id) => self.delete(&id).await.map(|_| Outcome::Deleted),
            Command::Show(id) => self.show(&id).await.map(Outcome::Shown),
            Command::Update(id, changes) => self.update(&id, &changes).await.map(|_| Outcome::Updated),
        }
    }

    /// Reloads the whole list. Returns how many records are now shown.
    pub async fn refresh(&mut self) -> Result<usize, SyncError> {
        // Without a usable config the list says what is missing; no request goes out.
        let config = self.config.current();
        if let Err(missing) = config.validate() {
            info!("Not loading grades: {}", missing);
            self.list.render_unconfigured(missing);
            return Err(missing.into());
        }

        // The whole list is replaced on success and swapped for the error
        // placeholder on failure; nothing partial is kept.
        match self.api.list(&config).await {
            Ok(records) => {
                info!("Loaded {} grades", records.len());
                self.list.render_records(&records);
                Ok(records.len())
            }
            Err(e) => {
                error!("Error al cargar notas: {}", e);
                self.list.render_error();
                Err(e.into())
            }
        }
    }

    /// Sends the form as a new grade. The form is cleared and the list
    /// reloaded only when the API accepts it.
    pub async fn create(&mut self, form: &mut GradeForm) -> Result<(), SyncError> {
        let grade = form.to_new_grade();
        let config = self.connection()?;

        // A rejected grade is alerted and the form keeps what the user typed.
        if let Err(e) = self.api.create(&config, &grade).await {
            error!("Error al crear la nota: {}", e);
            self.prompter.alert(&format!("{}: {}", SAVE_ERROR_PREFIX, e));
            return Err(e.into());
        }

        // Accepted: empty the form, then reload from the server.
        info!("Created grade for {} in {}", grade.student, grade.class);
        form.clear();
        self.reload().await;
        Ok(())
    }

    /// Deletes one record after the user confirms it.
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), SyncError> {
        let config = self.connection()?;

        // Declining is silent: no request, no alert.
        let question = format!("¿Seguro que quieres borrar la nota con ID: {}?", id);
        if !self.prompter.confirm(&question) {
            return Err(SyncError::UserDeclined);
        }

        // A failed delete leaves the rendered list as it was.
        if let Err(e) = self.api.delete(&config, id).await {
            error!("Error al borrar nota: {}", e);
            self.prompter.alert(&format!("{}: {}", DELETE_ERROR_PREFIX, e));
            return Err(e.into());
        }

        info!("Deleted grade {}", id);
        self.reload().await;
        Ok(())
    }

    /// Fetches a single record. The rendered list is left alone.
    pub async fn show(&self, id: &RecordId) -> Result<GradeRecord, SyncError> {
        let config = self.connection()?;

        self.api.get(&config, id).await.map_err(|e| {
            error!("Error al cargar la nota {}: {}", id, e);
            self.prompter.alert(&format!("{}: {}", SHOW_ERROR_PREFIX, e));
            SyncError::from(e)
        })
    }

    /// Applies a partial change to one record, then reloads the list.
    pub async fn update(&mut self, id: &RecordId, changes: &GradeUpdate) -> Result<(), SyncError> {
        let config = self.connection()?;

        // Same contract as create: alert on failure, reload only on success.
        if let Err(e) = self.api.update(&config, id, changes).await {
            error!("Error al actualizar la nota {}: {}", id, e);
            self.prompter.alert(&format!("{}: {}", UPDATE_ERROR_PREFIX, e));
            return Err(e.into());
        }

        info!("Updated grade {}", id);
        self.reload().await;
        Ok(())
    }

    // Settings for a mutation; missing fields are alerted, not rendered.
    fn connection(&self) -> Result<ConnectionConfig, ConfigMissing> {
        let config = self.config.current();
        config.validate().map_err(|missing| {
            self.prompter.alert(&format!("{} antes de continuar.", missing));
            missing
        })?;
        Ok(config)
    }

    // Refresh after a successful mutation. Its failure is already on screen
    // as the error placeholder and does not undo the mutation.
    async fn reload(&mut self) {
        let _ = self.refresh().await;
    }
}
