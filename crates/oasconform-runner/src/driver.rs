//! Conformance driver: samples requests, fires them, checks responses and
//! shrinks counterexamples.
//!
//! Each operation gets a fixed number of trials. A trial draws one value per
//! parameter, sends the request and runs the conformance checks. On the
//! first failing trial the driver switches to shrinking: it greedily adopts
//! any constraint-respecting simpler value that still reproduces a failure,
//! until no candidate fails or the request budget is spent.

use oasconform_core::factory::FactoryError;
use oasconform_core::generator::shrink::shrink_candidates;
use oasconform_core::generator::{Generator, SampleError};
use oasconform_core::schema::{ParamLocation, SchemaNode};
use oasconform_core::{ApiCatalog, CatalogError, GeneratorFactory, OperationTemplate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::checks::{Failure, FailureKind, run_checks};
use crate::client::{ApiRequest, RequestBody, Transport, TransportError};
use crate::loader::LoaderError;

/// Trials per operation when not configured otherwise.
pub const DEFAULT_TRIALS: u32 = 20;

/// Requests the shrinker may spend per counterexample.
pub const SHRINK_BUDGET: u32 = 50;

/// Inclusion probability for optional parameters.
const OPTIONAL_PARAM_RATE: f64 = 0.3;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("cannot build generators for {label}: {source}")]
    Build {
        label: String,
        #[source]
        source: FactoryError,
    },
    #[error("sampling failed for {label}: {source}")]
    Sample {
        label: String,
        #[source]
        source: SampleError,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no server URL: definition names no host and no base URL was configured")]
    NoBaseUrl,
}

/// The minimal failing request found for one operation.
#[derive(Debug)]
pub struct FailureCase {
    /// Parameter name to sampled value; `None` marks an omitted optional.
    pub values: Vec<(String, Option<Value>)>,
    pub status: u16,
    pub failures: Vec<Failure>,
    pub shrunk: bool,
}

#[derive(Debug)]
pub struct OperationReport {
    pub label: String,
    pub trials: u32,
    pub failure: Option<FailureCase>,
}

impl OperationReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// An operation the run could not exercise, with the reason.
#[derive(Debug)]
pub struct SkippedOperation {
    pub label: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct RunReport {
    pub seed: u64,
    pub reports: Vec<OperationReport>,
    pub skipped: Vec<SkippedOperation>,
}

impl RunReport {
    pub fn failures(&self) -> Vec<&OperationReport> {
        self.reports.iter().filter(|r| !r.passed()).collect()
    }

    pub fn passed(&self) -> bool {
        self.reports.iter().all(OperationReport::passed)
    }
}

#[derive(Debug, Clone)]
pub struct Driver {
    pub trials: u32,
    pub seed: Option<u64>,
    /// Stop at the first failing operation instead of testing the rest.
    pub fail_fast: bool,
    pub shrink_budget: u32,
}

impl Default for Driver {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            fail_fast: false,
            shrink_budget: SHRINK_BUDGET,
        }
    }
}

struct ParamSlot<'a> {
    node: &'a SchemaNode,
    generator: Generator,
}

impl Driver {
    /// Test every operation in the catalog through the given transport.
    ///
    /// Operations whose generators cannot be built (or whose sampling fails)
    /// are skipped and reported; a transport-level error counts as a
    /// conformance failure of the affected operation and the run continues.
    pub fn run(
        &self,
        transport: &dyn Transport,
        catalog: &ApiCatalog,
        factory: &GeneratorFactory,
    ) -> Result<RunReport, DriverError> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut skipped: Vec<SkippedOperation> = catalog
            .build_errors()
            .iter()
            .map(|e| SkippedOperation {
                label: format!("{} {}", e.method, e.path),
                reason: e.error.to_string(),
            })
            .collect();

        eprintln!(
            "Testing {} operations, {} trials each (seed {seed})...",
            catalog.operations().len(),
            self.trials
        );

        let mut reports = Vec::new();
        for op in catalog.operations() {
            match self.run_operation(transport, op, factory, &mut rng) {
                Ok(report) => {
                    match &report.failure {
                        Some(case) => eprintln!(
                            "  {}: FAILED with status {} ({} checks)",
                            report.label,
                            case.status,
                            case.failures.len()
                        ),
                        None => eprintln!("  {}: OK ({} trials)", report.label, report.trials),
                    }
                    let failed = !report.passed();
                    reports.push(report);
                    if failed && self.fail_fast {
                        eprintln!("Stopped early: failure detected");
                        break;
                    }
                }
                Err(err) => {
                    eprintln!("  {} {}: SKIPPED ({err})", op.method, op.path);
                    skipped.push(SkippedOperation {
                        label: format!("{} {}", op.method, op.path),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(RunReport {
            seed,
            reports,
            skipped,
        })
    }

    /// Run all trials for one operation, shrinking the first counterexample.
    pub fn run_operation(
        &self,
        transport: &dyn Transport,
        op: &OperationTemplate,
        factory: &GeneratorFactory,
        rng: &mut SmallRng,
    ) -> Result<OperationReport, DriverError> {
        let label = format!("{} {}", op.method, op.path);

        let mut slots = Vec::with_capacity(op.parameters.len());
        for node in &op.parameters {
            let generator = factory.build(node).map_err(|source| DriverError::Build {
                label: label.clone(),
                source,
            })?;
            slots.push(ParamSlot { node, generator });
        }

        for trial in 0..self.trials {
            let values = sample_trial(&slots, rng).map_err(|source| DriverError::Sample {
                label: label.clone(),
                source,
            })?;
            let request = build_request(op, &slots, &values);
            let response = match transport.send(&request) {
                Ok(response) => response,
                Err(e) => {
                    return Ok(OperationReport {
                        label,
                        trials: trial + 1,
                        failure: Some(FailureCase {
                            values: named_values(&slots, &values),
                            status: 0,
                            failures: vec![Failure {
                                kind: FailureKind::Transport,
                                message: e.to_string(),
                            }],
                            shrunk: false,
                        }),
                    });
                }
            };
            let failures = run_checks(op, &response);
            if failures.is_empty() {
                continue;
            }

            let (values, status, failures, shrunk) =
                self.shrink(transport, op, &slots, values, response.status, failures);
            return Ok(OperationReport {
                label,
                trials: trial + 1,
                failure: Some(FailureCase {
                    values: named_values(&slots, &values),
                    status,
                    failures,
                    shrunk,
                }),
            });
        }

        Ok(OperationReport {
            label,
            trials: self.trials,
            failure: None,
        })
    }

    /// Greedy shrink: re-issue the request with simpler parameter values and
    /// keep any that still fails a check. Transport hiccups end the search
    /// with the best counterexample found so far.
    fn shrink(
        &self,
        transport: &dyn Transport,
        op: &OperationTemplate,
        slots: &[ParamSlot<'_>],
        mut values: Vec<Option<Value>>,
        mut status: u16,
        mut failures: Vec<Failure>,
    ) -> (Vec<Option<Value>>, u16, Vec<Failure>, bool) {
        let mut budget = self.shrink_budget;
        let mut shrunk = false;

        'search: loop {
            for i in 0..slots.len() {
                let Some(current) = &values[i] else { continue };
                let slot = &slots[i];

                let mut candidates: Vec<Option<Value>> = Vec::new();
                if !slot.node.required {
                    candidates.push(None);
                }
                candidates.extend(
                    shrink_candidates(&slot.generator, current)
                        .into_iter()
                        .map(Some),
                );

                for candidate in candidates {
                    if budget == 0 {
                        break 'search;
                    }
                    budget -= 1;

                    let mut attempt = values.clone();
                    attempt[i] = candidate;
                    let request = build_request(op, slots, &attempt);
                    let Ok(response) = transport.send(&request) else {
                        break 'search;
                    };
                    let attempt_failures = run_checks(op, &response);
                    if !attempt_failures.is_empty() {
                        values = attempt;
                        status = response.status;
                        failures = attempt_failures;
                        shrunk = true;
                        continue 'search;
                    }
                }
            }
            break;
        }

        (values, status, failures, shrunk)
    }
}

/// Draw one value per parameter. Required parameters are always sent; every
/// optional parameter is included independently with [`OPTIONAL_PARAM_RATE`]
/// probability, whatever its location.
fn sample_trial(
    slots: &[ParamSlot<'_>],
    rng: &mut SmallRng,
) -> Result<Vec<Option<Value>>, SampleError> {
    slots
        .iter()
        .map(|slot| {
            let include = slot.node.required || rng.gen_bool(OPTIONAL_PARAM_RATE);
            if include {
                slot.generator.sample(rng).map(Some)
            } else {
                Ok(None)
            }
        })
        .collect()
}

fn build_request(
    op: &OperationTemplate,
    slots: &[ParamSlot<'_>],
    values: &[Option<Value>],
) -> ApiRequest {
    let mut request = ApiRequest {
        method: op.method,
        path: op.path.clone(),
        path_params: Vec::new(),
        query: Vec::new(),
        headers: Vec::new(),
        body: None,
    };

    for (slot, value) in slots.iter().zip(values) {
        let Some(value) = value else { continue };
        let name = slot.node.name.clone().unwrap_or_default();
        match slot.node.location {
            ParamLocation::Path => {
                request.path_params.push((name, value_to_param_string(value)));
            }
            ParamLocation::Query => {
                request.query.push((name, value_to_param_string(value)));
            }
            ParamLocation::Header => {
                request.headers.push((name, value_to_param_string(value)));
            }
            ParamLocation::Body => {
                request.body = Some(if slot.node.type_name == "file" {
                    RequestBody::Binary(
                        value.as_str().map(str::as_bytes).unwrap_or_default().to_vec(),
                    )
                } else {
                    RequestBody::Json(value.clone())
                });
            }
            ParamLocation::None => {}
        }
    }

    request
}

fn value_to_param_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn named_values(
    slots: &[ParamSlot<'_>],
    values: &[Option<Value>],
) -> Vec<(String, Option<Value>)> {
    slots
        .iter()
        .zip(values)
        .map(|(slot, value)| {
            (
                slot.node.name.clone().unwrap_or_default(),
                value.clone(),
            )
        })
        .collect()
}
