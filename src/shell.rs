use std::io::{self, BufRead, Write};
use log::warn;
use notas::config::{AuthMode, SessionConfig};
use notas::models::{GradeForm, GradeUpdate, GradeValue, RecordId};
use notas::sync::{Command, GradeSync, Outcome};
use notas::utils::api::GradesApi;
use notas::utils::prompt::Prompter;

const HELP: &str = "\
Comandos:
  list                         recarga la lista
  add                          rellena el formulario y crea la nota
  delete <id>                  borra una nota
  show <id>                    muestra una nota
  update <id> campo=valor ...  cambia clase, alumno o nota
  url <url>                    cambia la URL de la API
  key [valor]                  cambia (o borra) la API key
  auth <none|optional|required>
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    Run(Command),
    FillForm,
    SetUrl(String),
    SetKey(String),
    SetAuth(AuthMode),
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ShellAction>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let action = match verb {
        "list" | "ls" => ShellAction::Run(Command::Load),
        "add" => ShellAction::FillForm,
        "delete" | "rm" => ShellAction::Run(Command::Delete(required_id(words.next())?)),
        "show" => ShellAction::Run(Command::Show(required_id(words.next())?)),
        "update" => {
            let id = required_id(words.next())?;
            ShellAction::Run(Command::Update(id, parse_changes(words)?))
        }
        "url" => ShellAction::SetUrl(words.collect::<Vec<_>>().join(" ")),
        "key" => ShellAction::SetKey(words.next().unwrap_or_default().to_string()),
        "auth" => ShellAction::SetAuth(words.next().unwrap_or_default().parse()?),
        "help" | "?" => ShellAction::Help,
        "quit" | "exit" => ShellAction::Quit,
        other => return Err(format!("Comando desconocido: {}", other)),
    };
    Ok(Some(action))
}

// Takes the id argument; a missing or blank one is an input error.
fn required_id(word: Option<&str>) -> Result<RecordId, String> {
    word.map(RecordId::from)
        .filter(|id| !id.is_blank())
        .ok_or_else(|| "Falta el ID de la nota".to_string())
}

// Reads `campo=valor` pairs into a partial update; unknown fields are refused.
fn parse_changes<'a>(pairs: impl Iterator<Item = &'a str>) -> Result<GradeUpdate, String> {
    let mut changes = GradeUpdate::default();
    for pair in pairs {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Se esperaba campo=valor: {}", pair))?;
        match field.to_lowercase().as_str() {
            "clase" | "class" => changes.class = Some(value.to_string()),
            "alumno" | "student" => changes.student = Some(value.to_string()),
            "nota" | "grade" => changes.grade = Some(GradeValue::parse(value)),
            other => return Err(format!("Campo desconocido: {}", other)),
        }
    }
    Ok(changes)
}

// Prints the prompt and reads one line; `None` at end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

// Asks for each form field; an empty answer keeps what the form already holds.
fn fill_form(form: &mut GradeForm) -> io::Result<bool> {
    for (label, field) in [
        ("Clase", &mut form.class),
        ("Alumno", &mut form.student),
        ("Nota", &mut form.grade),
    ] {
        let prompt = if field.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, field)
        };
        match read_line(&prompt)? {
            Some(answer) if !answer.trim().is_empty() => *field = answer,
            Some(_) => {}
            None => return Ok(false),
        }
    }
    Ok(true)
}

/// Interactive session: loads the list, then runs commands until `quit` or
/// end of input. The form survives failed submissions.
pub async fn run<A, P>(sync: &mut GradeSync<A, SessionConfig, P>, session: &SessionConfig) -> io::Result<()>
where
    A: GradesApi,
    P: Prompter,
{
    let mut form = GradeForm::default();

    // Loads the list once on start, like opening the page.
    let _ = sync.refresh().await;
    print!("{}", sync.list());

    while let Some(line) = read_line("notas> ")? {
        let action = match parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            // Bad input is reported and the session carries on.
            Err(message) => {
                warn!("{}", message);
                continue;
            }
        };

        match action {
            ShellAction::Run(command) => {
                // A shown record replaces the list output for this turn.
                if let Ok(Outcome::Shown(record)) = sync.dispatch(command).await {
                    println!("{:#?}", record);
                } else {
                    print!("{}", sync.list());
                }
            }
            ShellAction::FillForm => {
                // End of input while filling the form ends the session.
                if !fill_form(&mut form)? {
                    break;
                }
                let _ = sync.create(&mut form).await;
                print!("{}", sync.list());
            }
            // Config edits only take effect on the next operation.
            ShellAction::SetUrl(url) => session.set_endpoint(url),
            ShellAction::SetKey(key) => session.set_api_key(key),
            ShellAction::SetAuth(auth) => session.set_auth(auth),
            ShellAction::Help => println!("{}", HELP),
            ShellAction::Quit => break,
        }
    }
    Ok(())
}
