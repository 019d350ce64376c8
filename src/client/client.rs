//! Terminal host for a quiz block.
//!
//! Runs the UI loop and plays the part of the surrounding assignment
//! editor: it owns the task context, applies the block's task commands and
//! shows its notifications. Network calls run on spawned tasks and report
//! back through a channel.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::block::{HydrateOutcome, QuizBlock, QuizBlockDeps, SaveOutcome};
use crate::context::{AssignmentRef, Session, TaskCommand};
use crate::models::{AssignmentTask, ViewMode};
use crate::notify::Notification;
use crate::service::{ServiceError, TaskService, WsTaskService};
use crate::terminal::TerminalGuard;

use super::state::ClientApp;
use super::ui;

/// Where to find the task and how to present it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub view: ViewMode,
    pub task_uuid: String,
    pub assignment_uuid: String,
    pub token: Option<String>,
}

/// Result of a spawned network call.
enum Completion {
    Saved(SaveOutcome),
    Hydrated(HydrateOutcome),
    TaskLoaded(Result<AssignmentTask, ServiceError>),
}

/// What a key press asks the loop to do.
enum Action {
    None,
    Save,
    Quit,
}

struct Host {
    service: Arc<dyn TaskService>,
    session: Session,
    tasks: mpsc::UnboundedReceiver<TaskCommand>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

/// Run the quiz block in the terminal until the user quits.
pub async fn run(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service: Arc<dyn TaskService> = Arc::new(WsTaskService::new(&config.host, config.port));
    let session = Session::new(config.token.clone());

    let (tasks_tx, tasks) = mpsc::unbounded_channel();
    let (notifications_tx, notifications) = mpsc::unbounded_channel();
    let (completions_tx, completions) = mpsc::unbounded_channel();

    let deps = QuizBlockDeps {
        service: Arc::clone(&service),
        session: session.clone(),
        assignment: AssignmentRef::new(config.assignment_uuid.clone()),
        tasks: tasks_tx,
        notifications: notifications_tx,
    };
    let block = QuizBlock::new(config.view, Some(config.task_uuid.clone()), deps);
    let mut app = ClientApp::new(block, format!("{}:{}", config.host, config.port));

    let mut host = Host {
        service,
        session,
        tasks,
        notifications,
        completions_tx,
        completions,
    };

    info!(
        task = %config.task_uuid,
        view = config.view.label(),
        "opening quiz block"
    );
    host.resync(&mut app);

    run_tui(&mut app, &mut host)
}

fn run_tui(app: &mut ClientApp, host: &mut Host) -> Result<(), Box<dyn std::error::Error>> {
    let mut guard = TerminalGuard::enter()?;

    while !app.should_quit {
        host.pump(app);

        guard.terminal().draw(|frame| ui::render(frame, app))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(app, key.code) {
                    Action::None => {}
                    Action::Save => host.save(app),
                    Action::Quit => app.should_quit = true,
                }
            }
        }
    }

    Ok(())
}

impl Host {
    /// Run the block's synchronization against the current context.
    fn resync(&mut self, app: &mut ClientApp) {
        let before = app.block.store().clone();
        if let Some(pending) = app.block.sync(&app.context) {
            let tx = self.completions_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Completion::Hydrated(pending.run().await));
            });
        }
        if app.block.store() != &before {
            app.store_replaced();
        }
    }

    fn save(&mut self, app: &mut ClientApp) {
        let Some(pending) = app.block.begin_save(&app.context) else {
            return;
        };
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Completion::Saved(pending.run().await));
        });
    }

    fn load_selected_task(&self, app: &ClientApp) {
        let Some(task_uuid) = app.context.selected_task_uuid().map(str::to_string) else {
            return;
        };
        debug!(task = %task_uuid, "loading task into context");

        let service = Arc::clone(&self.service);
        let token = self.session.access_token.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = service.get_task(&task_uuid, token.as_deref()).await;
            let _ = tx.send(Completion::TaskLoaded(result));
        });
    }

    /// Drain everything the block and the spawned calls produced.
    fn pump(&mut self, app: &mut ClientApp) {
        while let Ok(command) = self.tasks.try_recv() {
            if app.context.apply(command) {
                self.load_selected_task(app);
            }
        }

        while let Ok(notification) = self.notifications.try_recv() {
            app.show(notification);
        }

        while let Ok(completion) = self.completions.try_recv() {
            match completion {
                Completion::Saved(outcome) => {
                    app.block.finish_save(outcome);
                }
                Completion::Hydrated(outcome) => {
                    if app.block.finish_hydrate(outcome) {
                        app.store_replaced();
                    }
                }
                Completion::TaskLoaded(Ok(task)) => {
                    if app.context.set_task(task) {
                        self.resync(app);
                    }
                }
                Completion::TaskLoaded(Err(err)) => {
                    warn!(error = %err, "failed to load task into context");
                }
            }
        }

        // Completions may have queued more commands or toasts.
        while let Ok(notification) = self.notifications.try_recv() {
            app.show(notification);
        }
        while let Ok(command) = self.tasks.try_recv() {
            if app.context.apply(command) {
                self.load_selected_task(app);
            }
        }
    }
}

/// Handle keyboard input.
fn handle_input(app: &mut ClientApp, key: KeyCode) -> Action {
    if app.is_editing() {
        match key {
            KeyCode::Enter | KeyCode::Esc => app.finish_edit(),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        }
        return Action::None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        _ if !app.block.view().is_editable() => {}
        KeyCode::Enter | KeyCode::Char('i') => app.activate(),
        KeyCode::Char(' ') | KeyCode::Char('c') => app.toggle_correct(),
        KeyCode::Char('o') => app.add_option_to_focused(),
        KeyCode::Char('a') => app.add_question(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_focused(),
        KeyCode::Char('s') => return Action::Save,
        _ => {}
    }

    Action::None
}
