use serde::{Deserialize, Serialize};

/// One logged step of a reasoning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step_type: String,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Signed contribution to the pass's confidence picture; diagnostic
    /// only, never read back by the pipeline.
    pub confidence_impact: f64,
}

/// Append-only log of one reasoning pass, sealed when the pass returns.
///
/// Chains exist for explainability and for the multi-pass agreement
/// dimension of the confidence scorer; nothing else consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningChain {
    pub pass_name: String,
    pub steps: Vec<ReasoningStep>,
}

impl ReasoningChain {
    pub fn new(pass_name: impl Into<String>) -> Self {
        Self {
            pass_name: pass_name.into(),
            steps: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        step_type: impl Into<String>,
        description: impl Into<String>,
        inputs: Vec<String>,
        outputs: Vec<String>,
        confidence_impact: f64,
    ) {
        self.steps.push(ReasoningStep {
            step_type: step_type.into(),
            description: description.into(),
            inputs,
            outputs,
            confidence_impact,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_append_in_order() {
        let mut chain = ReasoningChain::new("extraction");
        chain.record("scan", "ran money patterns", vec![], vec!["$500".into()], 0.1);
        chain.record("scan", "ran date patterns", vec![], vec![], 0.0);
        assert_eq!(chain.steps.len(), 2);
        assert_eq!(chain.steps[0].outputs, vec!["$500".to_string()]);
    }
}
