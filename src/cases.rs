//! Randomized case generation from a declarative case table.
//!
//! The table lists candidate sizes per dimension, candidate `axes` arguments
//! and candidate engines. A [CaseGenerator] validates it once and then hands
//! out any number of replayable [Cases] iterators.
use crate::axes::{AxisArg, AxisSpec};
use crate::config::CheckConfig;
use crate::errors::CheckError;
use crate::ndarray_ext::{ArrayRng, NdArray};
use crate::ops::{Argument, Engine, OperatorDef};
use std::fmt;

/// Number of cases drawn by `Strategy::default()`.
pub const DEFAULT_MAX_EXAMPLES: usize = 100;

fn default_max_examples() -> usize {
    DEFAULT_MAX_EXAMPLES
}

/// How cases are picked from the table.
///
/// In JSON either a bare name (`"sampled"`, `"exhaustive"`) or
/// `{ "sampled": { "max_examples": N } }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "StrategyRepr")]
pub enum Strategy {
    /// `max_examples` cases, each drawing every parameter uniformly from its candidates.
    Sampled {
        #[serde(default = "default_max_examples")]
        max_examples: usize,
    },
    /// One case per combination of candidates, in lexicographic order.
    Exhaustive,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrategyRepr {
    Name(String),
    Sampled { sampled: SampledRepr },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SampledRepr {
    #[serde(default = "default_max_examples")]
    max_examples: usize,
}

impl TryFrom<StrategyRepr> for Strategy {
    type Error = String;

    fn try_from(repr: StrategyRepr) -> Result<Self, String> {
        match repr {
            StrategyRepr::Name(name) => match name.as_str() {
                "sampled" => Ok(Strategy::default()),
                "exhaustive" => Ok(Strategy::Exhaustive),
                _ => Err(format!("unknown strategy `{}`", name)),
            },
            StrategyRepr::Sampled { sampled } => Ok(Strategy::Sampled {
                max_examples: sampled.max_examples,
            }),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Sampled {
            max_examples: DEFAULT_MAX_EXAMPLES,
        }
    }
}

/// One generated input together with the operator configuration to run on it.
#[derive(Clone, Debug)]
pub struct Case {
    pub index: usize,
    pub input: NdArray<f32>,
    /// The `axes` argument exactly as listed in the table.
    pub axis_arg: Option<AxisArg>,
    /// `axis_arg` resolved against the input's rank.
    pub axes: AxisSpec,
    pub engine: Engine,
}

impl Case {
    /// Definition of the `Flip` operator under test for this case.
    pub fn operator_def(&self) -> OperatorDef {
        let def = OperatorDef::new("Flip").engine(self.engine);
        match self.axis_arg {
            Some(ref arg) => def.arg("axes", Argument::from(arg)),
            None => def,
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "case #{} (shape {:?}, axes {}, engine {})",
            self.index,
            self.input.shape(),
            self.axes,
            self.engine
        )
    }
}

/// Validated case table.
#[derive(Clone, Debug)]
pub struct CaseGenerator {
    seed: u64,
    dims: Vec<Vec<usize>>,
    axes: Vec<(Option<AxisArg>, AxisSpec)>,
    engines: Vec<Engine>,
    strategy: Strategy,
    len: usize,
}

impl CaseGenerator {
    /// Validates the table.
    ///
    /// Fails if any candidate list is empty, any `axes` candidate is invalid
    /// for the rank `dims.len()`, or an exhaustive table has more cases than
    /// fit in a `usize`.
    pub fn new(
        seed: u64,
        dims: Vec<Vec<usize>>,
        axes: Vec<Option<AxisArg>>,
        engines: Vec<Engine>,
        strategy: Strategy,
    ) -> Result<Self, CheckError> {
        if dims.is_empty() {
            return Err(CheckError::EmptyCandidates("dims".to_string()));
        }
        if let Some(i) = dims.iter().position(|d| d.is_empty()) {
            return Err(CheckError::EmptyCandidates(format!("dims[{}]", i)));
        }
        if axes.is_empty() {
            return Err(CheckError::EmptyCandidates("axes".to_string()));
        }
        if engines.is_empty() {
            return Err(CheckError::EmptyCandidates("engines".to_string()));
        }
        if let Strategy::Sampled { max_examples: 0 } = strategy {
            return Err(CheckError::Config(
                "max_examples must be positive".to_string(),
            ));
        }

        let rank = dims.len();
        let axes = axes
            .into_iter()
            .map(|arg| {
                let spec = AxisSpec::resolve(arg.as_ref(), rank)?;
                Ok((arg, spec))
            })
            .collect::<Result<Vec<_>, CheckError>>()?;

        let len = match strategy {
            Strategy::Sampled { max_examples } => max_examples,
            Strategy::Exhaustive => dims
                .iter()
                .map(|d| d.len())
                .chain([axes.len(), engines.len()])
                .try_fold(1usize, |acc, n| acc.checked_mul(n))
                .ok_or_else(|| {
                    CheckError::Config(
                        "exhaustive case table has too many combinations".to_string(),
                    )
                })?,
        };

        Ok(CaseGenerator {
            seed,
            dims,
            axes,
            engines,
            strategy,
            len,
        })
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckError> {
        CaseGenerator::new(
            config.seed,
            config.dims.clone(),
            config.axes.clone(),
            config.engines.clone(),
            config.strategy,
        )
    }

    /// Number of cases one iteration yields.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a validated table yields at least one case.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Starts a new pass over the cases. Every pass yields the same cases.
    pub fn iter(&self) -> Cases<'_> {
        Cases {
            table: self,
            rng: ArrayRng::from_seed(self.seed),
            next: 0,
            len: self.len(),
        }
    }

    // Candidate counts in lexicographic order: dims..., axes, engines.
    fn radices(&self) -> Vec<usize> {
        let mut radices = self.dims.iter().map(|d| d.len()).collect::<Vec<_>>();
        radices.push(self.axes.len());
        radices.push(self.engines.len());
        radices
    }

    fn choose(&self, index: usize, rng: &ArrayRng<f32>) -> Vec<usize> {
        let radices = self.radices();
        match self.strategy {
            Strategy::Sampled { .. } => radices.iter().map(|&n| rng.choose_index(n)).collect(),
            Strategy::Exhaustive => {
                let mut picks = vec![0; radices.len()];
                let mut rest = index;
                for (pick, &n) in picks.iter_mut().zip(radices.iter()).rev() {
                    *pick = rest % n;
                    rest /= n;
                }
                picks
            }
        }
    }
}

impl<'a> IntoIterator for &'a CaseGenerator {
    type Item = Case;
    type IntoIter = Cases<'a>;

    fn into_iter(self) -> Cases<'a> {
        self.iter()
    }
}

/// Lazy sequence of cases produced by `CaseGenerator::iter`.
pub struct Cases<'a> {
    table: &'a CaseGenerator,
    rng: ArrayRng<f32>,
    next: usize,
    len: usize,
}

impl<'a> Iterator for Cases<'a> {
    type Item = Case;

    fn next(&mut self) -> Option<Case> {
        if self.next >= self.len {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let table = self.table;
        let picks = table.choose(index, &self.rng);
        let rank = table.rank();
        let shape = table
            .dims
            .iter()
            .zip(picks.iter())
            .map(|(d, &p)| d[p])
            .collect::<Vec<_>>();
        let (axis_arg, axes) = table.axes[picks[rank]].clone();
        let engine = table.engines[picks[rank + 1]];
        let input = self.rng.standard_uniform(&shape);

        Some(Case {
            index,
            input,
            axis_arg,
            axes,
            engine,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.len - self.next;
        (rest, Some(rest))
    }
}

impl<'a> ExactSizeIterator for Cases<'a> {}
