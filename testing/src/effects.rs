//! Run effect descriptions without a Store.
//!
//! Useful for reducer tests that want to know which actions an effect would
//! feed back, without the feedback actually reaching the reducer.

use std::future::Future;
use std::pin::Pin;
use todo_sync_core::effect::Effect;

/// Execute `effects` in order and collect the actions they produce
///
/// Parallel children are run one after another, so the returned order is the
/// declaration order rather than the completion order.
pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
where
    A: Send + 'static,
    I: IntoIterator<Item = Effect<A>>,
{
    let mut actions = Vec::new();
    for effect in effects {
        run_effect(effect, &mut actions).await;
    }
    actions
}

fn run_effect<'a, A>(
    effect: Effect<A>,
    actions: &'a mut Vec<A>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    actions.push(action);
                }
            },
            Effect::Parallel(children) | Effect::Sequential(children) => {
                for child in children {
                    run_effect(child, actions).await;
                }
            },
        }
    })
}

/// Count the `Future` effects, looking inside `Parallel` and `Sequential`
#[must_use]
pub fn count_futures<A>(effects: &[Effect<A>]) -> usize {
    effects
        .iter()
        .map(|effect| match effect {
            Effect::None => 0,
            Effect::Future(_) => 1,
            Effect::Parallel(children) | Effect::Sequential(children) => count_futures(children),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_declaration_order() {
        let effects = vec![
            Effect::future(async { Some(1) }),
            Effect::None,
            Effect::chain(vec![
                Effect::future(async { None }),
                Effect::future(async { Some(2) }),
            ]),
            Effect::merge(vec![Effect::future(async { Some(3) })]),
        ];

        assert_eq!(count_futures(&effects), 4);
        let actions = tokio_test::block_on(collect_actions(effects));
        assert_eq!(actions, vec![1, 2, 3]);
    }
}
