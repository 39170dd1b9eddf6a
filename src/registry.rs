use crate::builtin::{BuiltinCommand, Cd, Echo, Exec, Exit, Fork, Kill, Ps, Pwd};
use crate::command::{Command, CommandFactory};

/// Factory allows creating instances of a built-in [`Command`] by name.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: BuiltinCommand> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str) -> Option<Box<dyn Command>> {
        (name == T::name()).then(|| Box::new(T::default()) as Box<dyn Command>)
    }
}

/// Maps command names to commands.
///
/// Factories are asked in registration order; the first one recognizing the
/// name wins. A name nobody recognizes is not an error.
pub struct Registry {
    factories: Vec<Box<dyn CommandFactory>>,
}

impl Registry {
    /// Create a registry from a custom set of factories.
    pub fn new(factories: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { factories }
    }

    /// Resolve `name`, or `None` when no factory knows it.
    pub fn lookup(&self, name: &str) -> Option<Box<dyn Command>> {
        self.factories.iter().find_map(|f| f.try_create(name))
    }
}

impl Default for Registry {
    /// The built-ins: `cd`, `pwd`, `echo`, `ps`, `kill`, `exec`, `fork`, `exit`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Echo>::default()),
            Box::new(Factory::<Ps>::default()),
            Box::new(Factory::<Kill>::default()),
            Box::new(Factory::<Exec>::default()),
            Box::new(Factory::<Fork>::default()),
            Box::new(Factory::<Exit>::default()),
        ])
    }
}
