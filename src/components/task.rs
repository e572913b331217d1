//! Cooperative task state machine.
//!
//! A [`Task`] is one step of sequenced behaviour. It moves through
//! `NotStarted → Running → Complete` and is stepped only by its owner (a
//! [`TaskController`](super::taskcontroller::TaskController) or a parent
//! group) calling [`Task::update`] once per frame. There is no threading and
//! nothing blocks: a task that has not finished simply reports so from
//! [`Task::is_complete`].
//!
//! # Architecture
//!
//! - **Tagged kind**: a task is either a [`TaskKind::Leaf`] (optional
//!   [`TaskWork`] plus callbacks) or a [`TaskKind::Group`] that owns its own
//!   chain of sub-tasks.
//! - **Three callback lists per task:**
//!   - start actions – run once when the task starts
//!   - completion predicates – polled every frame, *all* must hold
//!   - complete actions – run once when the owner completes the task
//! - **Chains**: `next` is an exclusively owned link, so a chain is a singly
//!   linked list. Groups nest chains inside chains to any depth.
//!
//! # Example
//!
//! ```ignore
//! let task = Task::wait(2.0)
//!     .on_complete(|world, owner| log::info!("{owner:?} waited"))
//!     .then(Task::group("patrol", [Task::wait(1.0), Task::wait(3.0)])?);
//! world.entity_mut(npc).insert(TaskController::with_task(task));
//! ```

use std::fmt;

use bevy_ecs::prelude::*;
use log::debug;

use crate::error::SceneError;
use crate::events::task::{TaskCompleted, TaskStarted};

/// Side-effecting callback run with the owner entity.
pub type TaskAction = Box<dyn FnMut(&mut World, Entity) + Send + Sync>;

/// Completion predicate. Polled every frame, so keep it cheap and pure.
pub type TaskPredicate = Box<dyn Fn(&World, Entity) -> bool + Send + Sync>;

/// Lifecycle of a task run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskState {
    #[default]
    NotStarted,
    Running,
    Complete,
}

/// Per-frame work performed by a leaf task.
pub trait TaskWork: Send + Sync {
    fn start(&mut self, _world: &mut World, _owner: Entity) {}

    fn update(&mut self, world: &mut World, owner: Entity, elapsed: f32);

    /// Work-specific part of completion; ANDed with the task's predicates.
    fn is_done(&self, world: &World, owner: Entity) -> bool;

    /// Return to the pre-start state so the task can run again.
    fn reset(&mut self) {}
}

/// Slack on [`Wait`] completion so summed `f32` frame steps land on the mark.
const WAIT_EPSILON: f32 = 1e-4;

/// Counts elapsed update time until `duration` seconds have passed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wait {
    pub duration: f32,
    pub elapsed: f32,
}

impl Wait {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }
}

impl TaskWork for Wait {
    fn update(&mut self, _world: &mut World, _owner: Entity, elapsed: f32) {
        self.elapsed += elapsed;
    }

    fn is_done(&self, _world: &World, _owner: Entity) -> bool {
        self.elapsed + WAIT_EPSILON >= self.duration
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

pub enum TaskKind {
    Leaf(Option<Box<dyn TaskWork>>),
    Group(TaskGroup),
}

/// Private sub-chain of a group task.
///
/// Completed sub-tasks stay in the chain; `cursor` counts how many have
/// finished, so the group can be reset and run again.
pub struct TaskGroup {
    head: Option<Box<Task>>,
    cursor: usize,
}

impl TaskGroup {
    fn new(head: Task) -> Self {
        Self {
            head: Some(Box::new(head)),
            cursor: 0,
        }
    }

    /// Sub-task currently being stepped, `None` once the chain is exhausted.
    pub fn current(&self) -> Option<&Task> {
        let mut node = self.head.as_deref()?;
        for _ in 0..self.cursor {
            node = node.next.as_deref()?;
        }
        Some(node)
    }

    fn current_mut(&mut self) -> Option<&mut Task> {
        let mut node = self.head.as_deref_mut()?;
        for _ in 0..self.cursor {
            node = node.next.as_deref_mut()?;
        }
        Some(node)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current().is_none()
    }

    /// Number of sub-tasks already completed.
    pub fn completed(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.head.as_deref().map_or(0, Task::chain_len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn update(&mut self, world: &mut World, owner: Entity, elapsed: f32) {
        if let Some(current) = self.current_mut() {
            current.update(world, owner, elapsed);
            if current.is_complete(world, owner) {
                current.complete(world, owner);
                self.cursor += 1;
            }
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
        let mut node = self.head.as_deref_mut();
        while let Some(task) = node {
            task.reset();
            node = task.next.as_deref_mut();
        }
    }
}

/// One cooperative step of sequenced behaviour.
pub struct Task {
    label: String,
    kind: TaskKind,
    state: TaskState,
    start_actions: Vec<TaskAction>,
    predicates: Vec<TaskPredicate>,
    complete_actions: Vec<TaskAction>,
    next: Option<Box<Task>>,
}

impl Task {
    /// Leaf task with no work of its own. Without predicates it completes on
    /// its first update.
    pub fn new(label: impl Into<String>) -> Self {
        Self::from_kind(label, TaskKind::Leaf(None))
    }

    pub fn with_work(label: impl Into<String>, work: impl TaskWork + 'static) -> Self {
        Self::from_kind(label, TaskKind::Leaf(Some(Box::new(work))))
    }

    pub fn wait(seconds: f32) -> Self {
        Self::with_work("wait", Wait::new(seconds))
    }

    /// Group running `tasks` in order. An empty group is a configuration error.
    pub fn group(
        label: impl Into<String>,
        tasks: impl IntoIterator<Item = Task>,
    ) -> Result<Self, SceneError> {
        let label = label.into();
        match Task::chain(tasks) {
            Some(head) => Ok(Self::from_kind(label, TaskKind::Group(TaskGroup::new(head)))),
            None => Err(SceneError::EmptyTaskGroup(label)),
        }
    }

    /// Link `tasks` into a chain and return its head.
    pub fn chain(tasks: impl IntoIterator<Item = Task>) -> Option<Task> {
        let mut tasks: Vec<Task> = tasks.into_iter().collect();
        let mut head: Option<Task> = None;
        while let Some(mut task) = tasks.pop() {
            if let Some(rest) = head.take() {
                task.push_last(rest);
            }
            head = Some(task);
        }
        head
    }

    fn from_kind(label: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            label: label.into(),
            kind,
            state: TaskState::NotStarted,
            start_actions: Vec::new(),
            predicates: Vec::new(),
            complete_actions: Vec::new(),
            next: None,
        }
    }

    pub fn on_start(mut self, action: impl FnMut(&mut World, Entity) + Send + Sync + 'static) -> Self {
        self.start_actions.push(Box::new(action));
        self
    }

    /// Add a completion predicate. All predicates must hold to complete.
    pub fn until(mut self, predicate: impl Fn(&World, Entity) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn on_complete(
        mut self,
        action: impl FnMut(&mut World, Entity) + Send + Sync + 'static,
    ) -> Self {
        self.complete_actions.push(Box::new(action));
        self
    }

    /// Append `next` at the end of this task's chain.
    pub fn then(mut self, next: Task) -> Self {
        self.push_last(next);
        self
    }

    fn push_last(&mut self, next: Task) {
        self.next = Some(Box::new(match self.next.take() {
            Some(rest) => (*rest).then(next),
            None => next,
        }));
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn as_group(&self) -> Option<&TaskGroup> {
        match &self.kind {
            TaskKind::Group(group) => Some(group),
            TaskKind::Leaf(_) => None,
        }
    }

    pub fn next_task(&self) -> Option<&Task> {
        self.next.as_deref()
    }

    /// Detach and return the rest of the chain.
    pub fn take_next(&mut self) -> Option<Box<Task>> {
        self.next.take()
    }

    /// Replace the rest of the chain. `None` cancels everything after this task.
    pub fn set_next(&mut self, next: Option<Task>) {
        self.next = next.map(Box::new);
    }

    /// Length of the chain starting at this task.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut node = self.next.as_deref();
        while let Some(task) = node {
            len += 1;
            node = task.next.as_deref();
        }
        len
    }

    /// Run the start actions and trigger [`TaskStarted`]. Does nothing unless
    /// the task is `NotStarted`.
    pub fn start(&mut self, world: &mut World, owner: Entity) {
        if self.state != TaskState::NotStarted {
            return;
        }
        self.state = TaskState::Running;
        debug!("task '{}' started on {:?}", self.label, owner);
        for action in self.start_actions.iter_mut() {
            action(world, owner);
        }
        if let TaskKind::Leaf(Some(work)) = &mut self.kind {
            work.start(world, owner);
        }
        world.trigger(TaskStarted {
            entity: owner,
            label: self.label.clone(),
        });
    }

    /// Step the task. Starts it first if needed; a completed task ignores updates.
    pub fn update(&mut self, world: &mut World, owner: Entity, elapsed: f32) {
        if self.state == TaskState::NotStarted {
            self.start(world, owner);
        }
        if self.state != TaskState::Running {
            return;
        }
        match &mut self.kind {
            TaskKind::Leaf(Some(work)) => work.update(world, owner, elapsed),
            TaskKind::Leaf(None) => {}
            TaskKind::Group(group) => group.update(world, owner, elapsed),
        }
    }

    /// Conjunction of the work's own condition (exhausted sub-chain for a
    /// group) and every registered predicate.
    pub fn is_complete(&self, world: &World, owner: Entity) -> bool {
        if self.state == TaskState::Complete {
            return true;
        }
        let body = match &self.kind {
            TaskKind::Leaf(Some(work)) => work.is_done(world, owner),
            TaskKind::Leaf(None) => true,
            TaskKind::Group(group) => group.is_exhausted(),
        };
        body && self.predicates.iter().all(|p| p(world, owner))
    }

    /// Run the complete actions and trigger [`TaskCompleted`]. Fires once per
    /// run; use [`reset`](Self::reset) to run the task again.
    pub fn complete(&mut self, world: &mut World, owner: Entity) {
        if self.state == TaskState::Complete {
            return;
        }
        self.state = TaskState::Complete;
        debug!("task '{}' completed on {:?}", self.label, owner);
        for action in self.complete_actions.iter_mut() {
            action(world, owner);
        }
        world.trigger(TaskCompleted {
            entity: owner,
            label: self.label.clone(),
        });
    }

    /// Back to `NotStarted`, including work state and group sub-chains.
    /// Side effects of earlier runs are not undone.
    pub fn reset(&mut self) {
        self.state = TaskState::NotStarted;
        match &mut self.kind {
            TaskKind::Leaf(Some(work)) => work.reset(),
            TaskKind::Leaf(None) => {}
            TaskKind::Group(group) => group.reset(),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("group", &self.as_group().map(TaskGroup::len))
            .field("start_actions", &self.start_actions.len())
            .field("predicates", &self.predicates.len())
            .field("complete_actions", &self.complete_actions.len())
            .field("next", &self.next.as_deref().map(Task::label))
            .finish()
    }
}
