// standard library
use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

// external crates
use log::{debug, trace};

// internal modules
use crate::error::{Error, Result};
use crate::key::Key;
use crate::provider::{Provider, Value};

type Run = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// How a quantity is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Fixed value set with [Pipeline::insert]
    Parameter,
    /// Function registered with [Pipeline::add_provider], by name
    Provider(&'static str),
}

/// One entry of an evaluation plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Name of the quantity produced
    pub output: &'static str,
    /// Where the quantity comes from
    pub kind: StepKind,
    /// Optional label attached at registration
    pub label: Option<String>,
}

#[derive(Clone)]
struct Task {
    inputs: Vec<Key>,
    kind: StepKind,
    label: Option<String>,
    run: Run,
}

impl Task {
    fn describe(&self, output: Key) -> &'static str {
        match self.kind {
            StepKind::Parameter => output.name(),
            StepKind::Provider(name) => name,
        }
    }
}

/// Handle to a newly registered provider
///
/// ```rust
/// # use nrefl_workflow::Pipeline;
/// # use std::convert::Infallible;
/// fn corrected(raw: &f64) -> Result<f32, Infallible> {
///     Ok(*raw as f32 * 0.5)
/// }
///
/// let mut pipeline = Pipeline::new();
/// pipeline.insert(4.0_f64);
/// pipeline.add_provider(corrected).label("halved");
///
/// assert_eq!(pipeline.labels::<f32>().unwrap(), vec!["halved"]);
/// ```
#[derive(Debug)]
pub struct Registered<'a> {
    task: &'a mut Task,
}

impl Registered<'_> {
    /// Attach a label to the provider
    pub fn label(self, label: impl Into<String>) {
        self.task.label = Some(label.into());
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Set of parameters and providers, keyed by the type they produce
///
/// Registering a parameter or provider for a type replaces whatever produced
/// that type before. Requests resolve the minimal set of tasks the target
/// needs and run each of them once.
///
/// ```rust
/// # use nrefl_workflow::{Error, Pipeline};
/// # use std::convert::Infallible;
/// struct Input(u32);
/// struct Output(u32);
///
/// fn square(x: &Input) -> Result<Output, Infallible> {
///     Ok(Output(x.0 * x.0))
/// }
///
/// let mut pipeline = Pipeline::new();
/// pipeline.add_provider(square);
///
/// // the input is missing
/// assert!(matches!(
///     pipeline.compute::<Output>(),
///     Err(Error::Unsatisfied { .. })
/// ));
///
/// pipeline.insert(Input(3));
/// assert_eq!(pipeline.compute::<Output>().unwrap().0, 9);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    tasks: HashMap<Key, Task>,
}

impl Pipeline {
    /// Empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any parameter or provider for its type
    pub fn insert<T>(&mut self, value: T) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        let value: Value = Arc::new(value);
        let run: Run = Arc::new(move |_| Ok(Arc::clone(&value)));
        self.tasks.insert(
            Key::of::<T>(),
            Task {
                inputs: Vec::new(),
                kind: StepKind::Parameter,
                label: None,
                run,
            },
        );
        self
    }

    /// Register a provider, replacing any parameter or provider for its output
    pub fn add_provider<P, Args, O, E>(&mut self, provider: P) -> Registered<'_>
    where
        P: Provider<Args, O, E>,
        O: Any + Send + Sync,
    {
        let key = Key::of::<O>();
        let inputs = provider.inputs();
        let kind = StepKind::Provider(provider.name());
        let run: Run = Arc::new(move |args| Ok(Arc::new(provider.invoke(args)?) as Value));

        trace!("Registered {} for {}", kind_name(kind), key);
        let task = Task {
            inputs,
            kind,
            label: None,
            run,
        };
        let task = match self.tasks.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(task);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(task),
        };
        Registered { task }
    }

    /// Whether anything produces `T`
    pub fn contains<T: Any>(&self) -> bool {
        self.tasks.contains_key(&Key::of::<T>())
    }

    /// Compute `T`, evaluating only what it depends on
    ///
    /// Every request starts from scratch, so a failure never affects later
    /// requests.
    pub fn compute<T>(&self) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let target = Key::of::<T>();
        let order = self.order(target)?;
        debug!("Computing {} in {} steps", target, order.len());

        let mut values: HashMap<Key, Value> = HashMap::with_capacity(order.len());
        for key in order {
            let task = self.task(key)?;
            let args = task
                .inputs
                .iter()
                .map(|input| {
                    values
                        .get(input)
                        .cloned()
                        .ok_or(Error::NotProvided(input.name()))
                })
                .collect::<Result<Vec<Value>>>()?;

            trace!("Running {} for {}", task.describe(key), key);
            let value = (task.run)(&args)?;
            values.insert(key, value);
        }

        values
            .remove(&target)
            .ok_or(Error::NotProvided(target.name()))?
            .downcast::<T>()
            .map_err(|_| Error::TypeMismatch(type_name::<T>()))
    }

    /// Steps needed to compute `T`, in evaluation order
    ///
    /// ```rust
    /// # use nrefl_workflow::{Pipeline, StepKind};
    /// # use std::convert::Infallible;
    /// fn widen(x: &u8) -> Result<u16, Infallible> {
    ///     Ok(*x as u16)
    /// }
    ///
    /// let mut pipeline = Pipeline::new();
    /// pipeline.insert(1_u8);
    /// pipeline.add_provider(widen);
    ///
    /// let plan = pipeline.plan::<u16>().unwrap();
    /// assert_eq!(plan.len(), 2);
    /// assert_eq!(plan[0].kind, StepKind::Parameter);
    /// assert_eq!(plan[1].output, "u16");
    /// ```
    pub fn plan<T: Any>(&self) -> Result<Vec<Step>> {
        self.order(Key::of::<T>())?
            .into_iter()
            .map(|key| {
                let task = self.task(key)?;
                Ok(Step {
                    output: key.name(),
                    kind: task.kind,
                    label: task.label.clone(),
                })
            })
            .collect()
    }

    /// Labels of every step needed to compute `T`, in evaluation order
    pub fn labels<T: Any>(&self) -> Result<Vec<String>> {
        Ok(self
            .plan::<T>()?
            .into_iter()
            .filter_map(|step| step.label)
            .collect())
    }

    fn task(&self, key: Key) -> Result<&Task> {
        self.tasks.get(&key).ok_or(Error::NotProvided(key.name()))
    }

    /// Topological order of everything `target` depends on, itself last
    fn order(&self, target: Key) -> Result<Vec<Key>> {
        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut order = Vec::new();
        self.visit(target, None, &mut marks, &mut stack, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        key: Key,
        required_by: Option<&'static str>,
        marks: &mut HashMap<Key, Mark>,
        stack: &mut Vec<Key>,
        order: &mut Vec<Key>,
    ) -> Result<()> {
        match marks.get(&key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|k| *k == key).unwrap_or(0);
                let mut cycle = stack[start..].iter().map(|k| k.name()).collect::<Vec<_>>();
                cycle.push(key.name());
                return Err(Error::Cycle(cycle));
            }
            None => {}
        }

        let task = self.tasks.get(&key).ok_or(match required_by {
            Some(parent) => Error::Unsatisfied {
                missing: key.name(),
                required_by: parent,
            },
            None => Error::NotProvided(key.name()),
        })?;

        marks.insert(key, Mark::Visiting);
        stack.push(key);
        for input in &task.inputs {
            self.visit(*input, Some(task.describe(key)), marks, stack, order)?;
        }
        stack.pop();
        marks.insert(key, Mark::Done);
        order.push(key);
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut entries = self
            .tasks
            .iter()
            .map(|(key, task)| (key.name(), task.kind))
            .collect::<Vec<_>>();
        entries.sort_by_key(|(name, _)| *name);
        f.debug_map().entries(entries).finish()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("inputs", &self.inputs)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .finish()
    }
}

fn kind_name(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Parameter => "parameter",
        StepKind::Provider(name) => name,
    }
}
