mod fixture;
mod run_effect_test;
