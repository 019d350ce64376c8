//! The quiz block component.
//!
//! Owns the question store and connects it to the task context and the
//! task service. Network work is split into `begin_*` / `run` / `finish_*`
//! so a UI loop can await it on another task while staying responsive; the
//! `save` and `hydrate` methods do all three steps in place.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::context::{AssignmentRef, Session, TaskCommand, TaskCommandSender, TaskContext};
use crate::models::{AssignmentTask, TaskUpdate, ViewMode};
use crate::notify::{Notification, NotificationSender};
use crate::service::{ServiceError, TaskService};
use crate::store::QuestionStore;

pub const SAVE_SUCCESS_MESSAGE: &str = "Task saved successfully";
pub const SAVE_ERROR_MESSAGE: &str = "Error saving task, please retry later.";

/// Everything the block needs from its surroundings.
#[derive(Clone)]
pub struct QuizBlockDeps {
    pub service: Arc<dyn TaskService>,
    pub session: Session,
    pub assignment: AssignmentRef,
    pub tasks: TaskCommandSender,
    pub notifications: NotificationSender,
}

pub struct QuizBlock {
    view: ViewMode,
    task_uuid: Option<String>,
    store: QuestionStore,
    deps: QuizBlockDeps,
    save_in_flight: bool,
    hydrate_generation: u64,
}

/// A save request detached from the block.
pub struct PendingSave {
    service: Arc<dyn TaskService>,
    update: TaskUpdate,
    task_uuid: String,
    assignment_uuid: String,
    token: Option<String>,
}

pub struct SaveOutcome {
    pub result: Result<(), ServiceError>,
}

impl PendingSave {
    pub async fn run(self) -> SaveOutcome {
        let result = self
            .service
            .update_task(
                &self.update,
                &self.task_uuid,
                &self.assignment_uuid,
                self.token.as_deref(),
            )
            .await;
        SaveOutcome { result }
    }
}

/// A fetch of the block's task detached from the block.
pub struct PendingHydrate {
    service: Arc<dyn TaskService>,
    task_uuid: String,
    token: Option<String>,
    generation: u64,
}

pub struct HydrateOutcome {
    pub generation: u64,
    pub result: Result<AssignmentTask, ServiceError>,
}

impl PendingHydrate {
    pub async fn run(self) -> HydrateOutcome {
        let result = self
            .service
            .get_task(&self.task_uuid, self.token.as_deref())
            .await;
        HydrateOutcome {
            generation: self.generation,
            result,
        }
    }
}

impl QuizBlock {
    pub fn new(view: ViewMode, task_uuid: Option<String>, deps: QuizBlockDeps) -> Self {
        Self {
            view,
            task_uuid,
            store: QuestionStore::new(),
            deps,
            save_in_flight: false,
            hydrate_generation: 0,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn task_uuid(&self) -> Option<&str> {
        self.task_uuid.as_deref()
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// Mutable access for editing. Student views are read-only, so this
    /// returns `None` there.
    pub fn store_mut(&mut self) -> Option<&mut QuestionStore> {
        if self.view.is_editable() {
            Some(&mut self.store)
        } else {
            None
        }
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// Re-synchronize with the task context.
    ///
    /// Always announces this block's task as the selected one first. A
    /// teacher view then adopts questions already loaded in the context; a
    /// student view asks for a fetch, returned for the caller to run.
    pub fn sync(&mut self, ctx: &TaskContext) -> Option<PendingHydrate> {
        self.send_task_command(TaskCommand::SetSelectedTask(self.task_uuid.clone()));

        match self.view {
            ViewMode::Teacher => {
                if let Some(questions) = ctx.quiz_questions() {
                    debug!(count = questions.len(), "adopting questions from task context");
                    self.store.replace(questions.to_vec());
                }
                None
            }
            ViewMode::Student => {
                let task_uuid = self.task_uuid.clone()?;
                Some(self.begin_hydrate(task_uuid))
            }
        }
    }

    pub async fn sync_and_hydrate(&mut self, ctx: &TaskContext) {
        if let Some(pending) = self.sync(ctx) {
            let outcome = pending.run().await;
            self.finish_hydrate(outcome);
        }
    }

    /// Start a fetch of `task_uuid`. Any fetch started earlier is now stale.
    pub fn begin_hydrate(&mut self, task_uuid: impl Into<String>) -> PendingHydrate {
        self.hydrate_generation += 1;
        PendingHydrate {
            service: Arc::clone(&self.deps.service),
            task_uuid: task_uuid.into(),
            token: self.deps.session.access_token.clone(),
            generation: self.hydrate_generation,
        }
    }

    /// Apply a fetch result. Returns true when the store was replaced.
    ///
    /// Failures leave the store as it was and are not shown to the user.
    pub fn finish_hydrate(&mut self, outcome: HydrateOutcome) -> bool {
        if outcome.generation != self.hydrate_generation {
            debug!(
                generation = outcome.generation,
                latest = self.hydrate_generation,
                "discarding stale fetch"
            );
            return false;
        }

        match outcome.result {
            Ok(task) => match task.contents.and_then(|contents| contents.questions) {
                Some(questions) => {
                    debug!(count = questions.len(), "hydrated quiz");
                    self.store.replace(questions);
                    true
                }
                None => {
                    warn!(task = %task.assignment_task_uuid, "task has no quiz contents");
                    false
                }
            },
            Err(err) => {
                warn!(error = %err, "failed to load quiz task");
                false
            }
        }
    }

    pub async fn hydrate(&mut self, task_uuid: impl Into<String>) -> bool {
        let outcome = self.begin_hydrate(task_uuid).run().await;
        self.finish_hydrate(outcome)
    }

    /// Start saving the current questions.
    ///
    /// Returns `None` while a previous save is still running, or when no
    /// task is known to save into (an error notification is sent then).
    pub fn begin_save(&mut self, ctx: &TaskContext) -> Option<PendingSave> {
        if self.save_in_flight {
            debug!("save already in flight");
            return None;
        }

        let Some(task_uuid) = ctx
            .target_task_uuid()
            .or(self.task_uuid.as_deref())
            .map(str::to_string)
        else {
            warn!("no task selected, nothing to save into");
            self.notify(Notification::error(SAVE_ERROR_MESSAGE));
            return None;
        };

        self.save_in_flight = true;
        Some(PendingSave {
            service: Arc::clone(&self.deps.service),
            update: self.store.to_update(),
            task_uuid,
            assignment_uuid: self.deps.assignment.assignment_uuid.clone(),
            token: self.deps.session.access_token.clone(),
        })
    }

    /// Report a save result: a reload and a success toast, or an error
    /// toast. Local edits are kept either way.
    pub fn finish_save(&mut self, outcome: SaveOutcome) -> bool {
        self.save_in_flight = false;

        match outcome.result {
            Ok(()) => {
                info!("quiz saved");
                self.send_task_command(TaskCommand::Reload);
                self.notify(Notification::success(SAVE_SUCCESS_MESSAGE));
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to save quiz");
                self.notify(Notification::error(SAVE_ERROR_MESSAGE));
                false
            }
        }
    }

    pub async fn save(&mut self, ctx: &TaskContext) -> bool {
        let Some(pending) = self.begin_save(ctx) else {
            return false;
        };
        let outcome = pending.run().await;
        self.finish_save(outcome)
    }

    fn send_task_command(&self, command: TaskCommand) {
        if self.deps.tasks.send(command).is_err() {
            debug!("task context is gone");
        }
    }

    fn notify(&self, notification: Notification) {
        if self.deps.notifications.send(notification).is_err() {
            debug!("notification sink is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::models::{Question, TaskContents, TaskType};
    use crate::notify::NotificationKind;
    use crate::service::mock::MockTaskService;

    struct Harness {
        block: QuizBlock,
        service: Arc<MockTaskService>,
        tasks: mpsc::UnboundedReceiver<TaskCommand>,
        notifications: mpsc::UnboundedReceiver<Notification>,
    }

    fn harness(view: ViewMode, service: MockTaskService) -> Harness {
        let service = Arc::new(service);
        let (tasks_tx, tasks) = mpsc::unbounded_channel();
        let (notify_tx, notifications) = mpsc::unbounded_channel();
        let deps = QuizBlockDeps {
            service: service.clone(),
            session: Session::new(Some("token-1".to_string())),
            assignment: AssignmentRef::new("assignment_1"),
            tasks: tasks_tx,
            notifications: notify_tx,
        };
        Harness {
            block: QuizBlock::new(view, Some("task_1".to_string()), deps),
            service,
            tasks,
            notifications,
        }
    }

    fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = rx.try_recv() {
            items.push(item);
        }
        items
    }

    fn quiz_task(questions: Vec<Question>) -> AssignmentTask {
        AssignmentTask {
            assignment_task_uuid: "task_1".to_string(),
            assignment_uuid: "assignment_1".to_string(),
            title: "Week 1".to_string(),
            task_type: TaskType::Quiz,
            contents: Some(TaskContents {
                questions: Some(questions),
            }),
        }
    }

    fn sample_questions() -> Vec<Question> {
        let mut first = Question::blank();
        first.question_text = "What does `&mut` grant?".to_string();
        first.options[0].text = "Exclusive access".to_string();
        first.options[0].correct = true;
        let mut second = Question::blank();
        second.question_text = "Is `Rc` Send?".to_string();
        vec![first, second]
    }

    fn loaded_context(questions: Vec<Question>) -> TaskContext {
        let mut ctx = TaskContext::new();
        ctx.apply(TaskCommand::SetSelectedTask(Some("task_1".to_string())));
        ctx.set_task(quiz_task(questions));
        ctx
    }

    #[tokio::test]
    async fn test_save_sends_store_and_reloads() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let ctx = loaded_context(vec![]);
        h.block.store_mut().unwrap().set_question_text(0, "Why borrow?");
        let expected = h.block.store().questions().to_vec();

        assert!(h.block.save(&ctx).await);

        let updates = h.service.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update.contents.questions.as_deref(), Some(&expected[..]));
        assert_eq!(updates[0].task_uuid, "task_1");
        assert_eq!(updates[0].assignment_uuid, "assignment_1");
        assert_eq!(updates[0].token.as_deref(), Some("token-1"));

        assert_eq!(drain(&mut h.tasks), vec![TaskCommand::Reload]);
        assert_eq!(
            drain(&mut h.notifications),
            vec![Notification::success(SAVE_SUCCESS_MESSAGE)]
        );
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_and_shows_error() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::failing());
        let ctx = loaded_context(vec![]);
        h.block.store_mut().unwrap().set_question_text(0, "Unsaved");

        assert!(!h.block.save(&ctx).await);

        assert!(drain(&mut h.tasks).is_empty());
        let notes = drain(&mut h.notifications);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].message, SAVE_ERROR_MESSAGE);
        assert_eq!(h.block.store().questions()[0].question_text, "Unsaved");
        assert!(!h.block.is_saving());
    }

    #[tokio::test]
    async fn test_second_save_while_in_flight_is_refused() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let ctx = loaded_context(vec![]);

        let pending = h.block.begin_save(&ctx).unwrap();
        assert!(h.block.is_saving());
        assert!(h.block.begin_save(&ctx).is_none());

        let outcome = pending.run().await;
        h.block.finish_save(outcome);
        assert!(h.block.begin_save(&ctx).is_some());
        assert!(drain(&mut h.notifications).len() == 1);
    }

    #[tokio::test]
    async fn test_save_falls_back_to_block_task() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let ctx = TaskContext::new();

        assert!(h.block.save(&ctx).await);
        assert_eq!(h.service.updates()[0].task_uuid, "task_1");
    }

    #[tokio::test]
    async fn test_save_without_any_task_fails() {
        let service = Arc::new(MockTaskService::new());
        let (tasks_tx, mut tasks) = mpsc::unbounded_channel();
        let (notify_tx, mut notifications) = mpsc::unbounded_channel();
        let deps = QuizBlockDeps {
            service: service.clone(),
            session: Session::default(),
            assignment: AssignmentRef::new("assignment_1"),
            tasks: tasks_tx,
            notifications: notify_tx,
        };
        let mut block = QuizBlock::new(ViewMode::Teacher, None, deps);

        assert!(!block.save(&TaskContext::new()).await);
        assert!(service.updates().is_empty());
        assert!(drain(&mut tasks).is_empty());
        assert_eq!(drain(&mut notifications)[0].kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_teacher_sync_adopts_context_questions() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let questions = sample_questions();
        let ctx = loaded_context(questions.clone());

        assert!(h.block.sync(&ctx).is_none());

        assert_eq!(h.block.store().questions(), &questions[..]);
        assert_eq!(
            drain(&mut h.tasks),
            vec![TaskCommand::SetSelectedTask(Some("task_1".to_string()))]
        );
        assert_eq!(h.service.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_teacher_sync_without_contents_keeps_seed() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let before = h.block.store().clone();

        h.block.sync_and_hydrate(&TaskContext::new()).await;

        assert_eq!(h.block.store(), &before);
        assert_eq!(drain(&mut h.tasks).len(), 1);
    }

    #[tokio::test]
    async fn test_student_sync_hydrates_from_service() {
        let questions = sample_questions();
        let service = MockTaskService::with_task(quiz_task(questions.clone()));
        let mut h = harness(ViewMode::Student, service);

        h.block.sync_and_hydrate(&TaskContext::new()).await;

        assert_eq!(h.block.store().questions(), &questions[..]);
        assert_eq!(h.service.fetch_count(), 1);
        assert_eq!(
            drain(&mut h.tasks),
            vec![TaskCommand::SetSelectedTask(Some("task_1".to_string()))]
        );
        assert!(h.block.store_mut().is_none());
    }

    #[tokio::test]
    async fn test_failed_hydrate_is_silent() {
        let mut h = harness(ViewMode::Student, MockTaskService::failing());
        let before = h.block.store().clone();

        assert!(!h.block.hydrate("task_1").await);

        assert_eq!(h.block.store(), &before);
        assert!(drain(&mut h.notifications).is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_without_quiz_contents_is_silent() {
        let mut task = quiz_task(vec![]);
        task.contents = None;
        let mut h = harness(ViewMode::Student, MockTaskService::with_task(task));
        let before = h.block.store().clone();

        assert!(!h.block.hydrate("task_1").await);

        assert_eq!(h.service.fetch_count(), 1);
        assert_eq!(h.block.store(), &before);
        assert!(drain(&mut h.notifications).is_empty());
    }

    #[tokio::test]
    async fn test_stale_hydrate_is_discarded() {
        let service = MockTaskService::with_task(quiz_task(sample_questions()));
        let mut h = harness(ViewMode::Student, service);
        let before = h.block.store().clone();

        let first = h.block.begin_hydrate("task_1");
        let second = h.block.begin_hydrate("task_1");

        let stale = first.run().await;
        assert!(!h.block.finish_hydrate(stale));
        assert_eq!(h.block.store(), &before);

        let latest = second.run().await;
        assert!(h.block.finish_hydrate(latest));
        assert_eq!(h.block.store().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_toggle_save_scenario() {
        let mut h = harness(ViewMode::Teacher, MockTaskService::new());
        let ctx = loaded_context(vec![]);

        let store = h.block.store_mut().unwrap();
        store.add_option(0);
        assert_eq!(store.questions()[0].options.len(), 2);
        assert!(store.questions()[0].options[1].text.is_empty());
        assert!(!store.questions()[0].options[1].correct);

        store.toggle_correct(0, 1);
        assert!(store.questions()[0].options[1].correct);
        assert!(!store.questions()[0].options[0].correct);

        assert!(h.block.save(&ctx).await);
        assert_eq!(drain(&mut h.tasks), vec![TaskCommand::Reload]);
        let notes = drain(&mut h.notifications);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Success);
    }
}
