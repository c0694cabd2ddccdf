use crate::fitness::{Fitness, FitnessEvaluator};
use rayon::prelude::*;
use wifiplan_common::layout::instance::Instance;
use wifiplan_common::layout::routers::RouterSet;

/// Maps `eval` over `items`, giving every worker its own state from `init`.
/// Output order matches input order. With `parallel` off the same map runs on
/// the calling thread with a single state.
pub fn map_with_state<T, W, R, I, F>(items: &[T], parallel: bool, init: I, eval: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    I: Fn() -> W + Sync + Send,
    F: Fn(&mut W, &T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map_init(&init, |state, item| eval(state, item)).collect()
    } else {
        let mut state = init();
        items.iter().map(|item| eval(&mut state, item)).collect()
    }
}

/// Scores a whole population, one evaluator per worker.
pub fn evaluate_population(instance: &Instance, population: &[RouterSet], parallel: bool) -> Vec<Fitness> {
    map_with_state(
        population,
        parallel,
        || FitnessEvaluator::new(instance),
        |evaluator, routers| evaluator.evaluate(routers.as_slice()),
    )
}
