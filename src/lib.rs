//! # stats-inference
//!
//! Statistical core of a set of interactive statistics-teaching pages. The pages themselves
//! (widgets, uploads, chart styling) live elsewhere and call into this crate with validated
//! numbers.
//!
//! ## Core Features
//!
//! - **Inference Engine**: one-sample Z and t tests, two-sample pooled, Welch and paired t-tests,
//!   each returning the standard error, degrees of freedom, critical value, test statistic,
//!   p-value, confidence interval and reject/accept decision
//! - **Power**: Type II error and power of two-sample tests at the observed difference
//! - **Chart Data**: sampling-distribution curves with rejection and acceptance regions
//! - **Distribution Tables**: PDF/PMF, moments and plot grids for the common continuous and
//!   discrete families, with explicit errors for undefined moments
//! - **Central Limit Theorem**: seeded population generation and resampling of sample means
//! - **Descriptive Statistics**: column summaries and correlation matrices
//!
//! ## Quick Start
//!
//! Build a [`testing::SampleSummary`] per sample and either call the functions in
//! [`testing::inference`] directly or describe the request with a [`testing::TestConfig`] and
//! pass it to [`testing::inference::infer`].
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Inference engine, shared numeric helpers, errors and chart data
//! - **[`distributions`]**: Probability distribution families
//! - **[`sampling`]**: Sampling-distribution demonstrations
//! - **[`descriptive`]**: Summaries of raw data columns

pub mod descriptive;
pub mod distributions;
pub mod sampling;
pub mod testing;
