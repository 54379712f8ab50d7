//! # todo-sync core
//!
//! Core traits and types for the todo-sync view reconciler.
//!
//! The reconciler follows the Reducer pattern: every user intent and every
//! network result is an action, a pure reducer folds it into state and
//! describes the side effects to run next. This crate holds the pieces every
//! other crate in the workspace depends on.
//!
//! ## Core Concepts
//!
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: description of a side effect (store call, presenter call)
//! - **Todo**: the record served by the remote todo collection
//! - **View types**: scope, due buckets, grouped views and render snapshots
//! - **`TodoStoreClient`**: the CRUD contract the reconciler relies on
//! - **`Presenter`**: the presentation layer the reconciler drives
//!
//! ## Example
//!
//! ```ignore
//! impl Reducer for Reconciler {
//!     type State = TodoAppState;
//!     type Action = TodoAction;
//!     type Environment = ReconcilerEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoAppState,
//!         action: TodoAction,
//!         env: &ReconcilerEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         match action {
//!             TodoAction::Load => smallvec![fetch_all(env)],
//!             _ => SmallVec::new(),
//!         }
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

pub mod presenter;
pub mod store_client;
pub mod todo;
pub mod view;

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They never perform I/O themselves; anything that touches the network or
/// the screen is returned as an [`Effect`](crate::effect::Effect).
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects the runtime must
        /// execute. Most actions produce at most a handful of effects, hence
        /// the inline capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. The Store runtime executes them and
/// feeds any action they produce back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future produced by [`Effect::Future`].
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another, each finishing before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into the reducer
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn effect_debug_hides_future_body() {
        let effect: Effect<u8> = Effect::future(async { Some(1) });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn chain_and_merge_wrap_children() {
        let chained: Effect<u8> = Effect::chain(vec![Effect::None, Effect::None]);
        assert!(matches!(chained, Effect::Sequential(ref v) if v.len() == 2));

        let merged: Effect<u8> = Effect::merge(vec![Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref v) if v.len() == 1));
        assert!(!merged.is_none());
        assert!(Effect::<u8>::None.is_none());
    }

    #[test]
    fn future_effect_yields_action() {
        let effect: Effect<u8> = Effect::future(async { Some(7) });
        let Effect::Future(fut) = effect else {
            unreachable!("constructed as a future");
        };
        assert_eq!(tokio_test::block_on(fut), Some(7));
    }
}
