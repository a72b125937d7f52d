mod bootstrap;
mod demo_scene;
mod loop_runner;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
