#![allow(clippy::cast_precision_loss, clippy::float_cmp)]

mod builder;
mod elimination;
mod minimize;
mod propose;
mod record;
mod run;
mod shared;

use tunebandit::hyperparameter::Hyperparameter;
use tunebandit::tunable::Tunable;

/// A one-dimensional float tunable on `[0, 1]`.
fn unit_tunable() -> Tunable {
    Tunable::new([("x", Hyperparameter::float(0.0, 1.0))]).unwrap()
}
