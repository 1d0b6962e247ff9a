use chrono::{DateTime, Local};

/// Outcome status of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    Failed,
}

impl ProbeStatus {
    /// Lowercase label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Why a probe produced no latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The ping program did not finish within its budget
    Timeout,
    /// The ping program could not be run at all
    ExecutionError,
    /// Output arrived but carried no latency (unreachable, filtered, ...)
    NoReply,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ExecutionError => "execution error",
            Self::NoReply => "no reply",
        }
    }
}

/// Classified result of one probe, before it is stamped by the session
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Reply { latency_ms: f64 },
    Lost { failure: FailureKind, diagnostic: String },
}

/// One completed probe attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// 1-based position in the session
    pub sequence: u64,
    pub observed_at: DateTime<Local>,
    pub status: ProbeStatus,
    /// Present iff `status` is `Success`
    pub latency_ms: Option<f64>,
    /// Present iff `status` is `Failed`
    pub failure: Option<FailureKind>,
    /// Raw cause of a failure, empty on success
    pub diagnostic: Option<String>,
}

impl ProbeOutcome {
    fn from_observation(sequence: u64, observation: Observation, observed_at: DateTime<Local>) -> Self {
        match observation {
            Observation::Reply { latency_ms } => Self {
                sequence,
                observed_at,
                status: ProbeStatus::Success,
                latency_ms: Some(latency_ms.max(0.0)),
                failure: None,
                diagnostic: None,
            },
            Observation::Lost { failure, diagnostic } => Self {
                sequence,
                observed_at,
                status: ProbeStatus::Failed,
                latency_ms: None,
                failure: Some(failure),
                diagnostic: Some(diagnostic),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// A complete monitoring session: target, start time and every outcome in order.
///
/// Outcomes can only be appended through [`Session::record`], which assigns the
/// next sequence number, so the history is always `1..=len` with no gaps.
#[derive(Debug, Clone)]
pub struct Session {
    pub target: String,
    pub started_at: DateTime<Local>,
    outcomes: Vec<ProbeOutcome>,
}

impl Session {
    pub fn new(target: impl Into<String>) -> Self {
        Self::started_at(target, Local::now())
    }

    /// Create a session with an explicit start time
    pub fn started_at(target: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self {
            target: target.into(),
            started_at,
            outcomes: Vec::new(),
        }
    }

    /// Append an observation as the next outcome
    pub fn record(&mut self, observation: Observation, observed_at: DateTime<Local>) -> &ProbeOutcome {
        let sequence = self.outcomes.len() as u64 + 1;
        self.outcomes
            .push(ProbeOutcome::from_observation(sequence, observation, observed_at));
        &self.outcomes[self.outcomes.len() - 1]
    }

    /// Read-only view of all outcomes, oldest first
    pub fn snapshot(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Most recent outcome, if any
    pub fn last(&self) -> Option<&ProbeOutcome> {
        self.outcomes.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost(kind: FailureKind) -> Observation {
        Observation::Lost {
            failure: kind,
            diagnostic: "STDOUT: 'Timeout' | STDERR: ''".to_string(),
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new("8.8.8.8");
        assert_eq!(session.target, "8.8.8.8");
        assert!(session.is_empty());
        assert!(session.last().is_none());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_record_assigns_sequence_from_one() {
        let mut session = Session::new("example.com");
        let now = Local::now();

        assert_eq!(session.record(Observation::Reply { latency_ms: 12.5 }, now).sequence, 1);
        assert_eq!(session.record(lost(FailureKind::Timeout), now).sequence, 2);
        assert_eq!(session.record(Observation::Reply { latency_ms: 9.0 }, now).sequence, 3);

        let sequences: Vec<u64> = session.snapshot().iter().map(|o| o.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_success_outcome_fields() {
        let mut session = Session::new("1.1.1.1");
        let outcome = session.record(Observation::Reply { latency_ms: 23.4 }, Local::now());

        assert_eq!(outcome.status, ProbeStatus::Success);
        assert_eq!(outcome.latency_ms, Some(23.4));
        assert!(outcome.failure.is_none());
        assert!(outcome.diagnostic.is_none());
        assert!(outcome.is_success());
    }

    #[test]
    fn test_failed_outcome_fields() {
        let mut session = Session::new("1.1.1.1");
        let outcome = session.record(lost(FailureKind::NoReply), Local::now());

        assert_eq!(outcome.status, ProbeStatus::Failed);
        assert!(outcome.latency_ms.is_none());
        assert_eq!(outcome.failure, Some(FailureKind::NoReply));
        assert!(outcome.diagnostic.as_deref().unwrap().contains("Timeout"));
    }

    #[test]
    fn test_negative_latency_is_clamped() {
        let mut session = Session::new("1.1.1.1");
        let outcome = session.record(Observation::Reply { latency_ms: -0.5 }, Local::now());
        assert_eq!(outcome.latency_ms, Some(0.0));
    }

    #[test]
    fn test_last_tracks_most_recent() {
        let mut session = Session::new("host");
        let now = Local::now();
        session.record(Observation::Reply { latency_ms: 1.0 }, now);
        session.record(lost(FailureKind::ExecutionError), now);

        let last = session.last().unwrap();
        assert_eq!(last.sequence, 2);
        assert_eq!(last.failure, Some(FailureKind::ExecutionError));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ProbeStatus::Success.label(), "success");
        assert_eq!(ProbeStatus::Failed.label(), "failed");
        assert_eq!(FailureKind::Timeout.label(), "timeout");
    }

    use proptest::prelude::*;

    proptest! {
        /// Any mix of replies and losses is numbered 1..=N in arrival order
        #[test]
        fn proptest_sequences_are_contiguous(
            history in prop::collection::vec(prop::option::of(0.0f64..2000.0), 0..150)
        ) {
            let mut session = Session::new("host");
            let now = Local::now();
            for latency in &history {
                let observation = match latency {
                    Some(latency_ms) => Observation::Reply { latency_ms: *latency_ms },
                    None => lost(FailureKind::NoReply),
                };
                let seq = session.record(observation, now).sequence;
                prop_assert_eq!(seq, session.len() as u64);
            }

            let sequences: Vec<u64> = session.snapshot().iter().map(|o| o.sequence).collect();
            let expected: Vec<u64> = (1..=history.len() as u64).collect();
            prop_assert_eq!(sequences, expected);

            let statuses_match = session
                .snapshot()
                .iter()
                .zip(&history)
                .all(|(o, l)| o.is_success() == l.is_some());
            prop_assert!(statuses_match);
        }
    }
}
