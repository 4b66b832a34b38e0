use super::EvalSample;

/// A scoring dimension with its rubric and score range.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    pub evaluation_steps: Vec<String>,
    pub min_score: f64,
    pub max_score: f64,
}

impl Criterion {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        evaluation_steps: Vec<String>,
        min_score: f64,
        max_score: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            evaluation_steps,
            min_score,
            max_score,
        }
    }

    pub fn completeness() -> Self {
        Self::new(
            "completeness",
            "How fully the generated answer covers the key facts of the reference answer. \
             1: misses most key facts. 2: covers some key facts. 3: covers all key facts.",
            vec![
                "List the key facts stated in the reference answer.".to_string(),
                "Check which of those facts appear in the generated answer.".to_string(),
                "Penalize facts that contradict the reference answer.".to_string(),
                "Assign a score from 1 to 3.".to_string(),
            ],
            1.0,
            3.0,
        )
    }

    pub fn redundancy() -> Self {
        Self::new(
            "redundancy",
            "How free the generated answer is of repeated or irrelevant content. \
             1: heavily repetitive or padded. 2: some repetition. 3: concise with no repetition.",
            vec![
                "Read the generated answer in full.".to_string(),
                "Note statements that repeat earlier content or do not address the question."
                    .to_string(),
                "Assign a score from 1 to 3.".to_string(),
            ],
            1.0,
            3.0,
        )
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::completeness(), Self::redundancy()]
    }

    pub fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.min_score, self.max_score)
    }

    pub(crate) fn prompt(&self, sample: &EvalSample) -> String {
        let steps = self
            .evaluation_steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "You will be given a question, a generated answer and a reference answer.\n\
             Rate the generated answer on one metric.\n\n\
             Evaluation criteria:\n{name} ({min}-{max}): {description}\n\n\
             Evaluation steps:\n{steps}\n\n\
             Question:\n{query}\n\n\
             Generated answer:\n{generated}\n\n\
             Reference answer:\n{expected}\n\n\
             Reply with a JSON object containing a numeric \"score\" between {min} and {max} \
             and a short \"explanation\".",
            name = self.name,
            min = self.min_score,
            max = self.max_score,
            description = self.description,
            query = sample.query,
            generated = sample.generated_response,
            expected = sample.expected_response,
        )
    }
}
