use tracing::{debug, info, instrument, warn};

use crate::models::email::{EmailCandidate, ExistenceResult, NameField, NameTokens, ResolutionOutcome};
use crate::services::directory::ExistenceCheck;
use crate::services::error::ResolutionFailure;
use crate::services::generator::{alternate_candidates, primary_candidate};

/// Finds the first unclaimed `{first}.{surname}@{domain}` address.
///
/// Checks are issued one at a time and the run stops at the first free
/// candidate. Dropping the future between checks abandons the run cleanly.
#[derive(Debug, Clone)]
pub struct EmailResolver {
    domain: String,
}

impl EmailResolver {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Runs one resolution.
    ///
    /// 1. The primary candidate (first name token, last surname token) is
    ///    checked. `Free` resolves, `Unknown` fails the run.
    /// 2. If it is taken and both sequences hold one token, there is nothing
    ///    else to try.
    /// 3. Otherwise the remaining pairs are walked in search order; pairs whose
    ///    check is `Unknown` are skipped.
    #[instrument(skip(self, checker), fields(domain = %self.domain))]
    pub async fn resolve<C>(
        &self,
        first: &NameTokens,
        surname: &NameTokens,
        checker: &C,
    ) -> ResolutionOutcome
    where
        C: ExistenceCheck + ?Sized,
    {
        if first.is_empty() {
            return ResolutionOutcome::EmptyTokenSequence(NameField::Name);
        }
        if surname.is_empty() {
            return ResolutionOutcome::EmptyTokenSequence(NameField::Surname);
        }
        let Some(primary) = primary_candidate(first, surname, &self.domain) else {
            return ResolutionOutcome::EmptyTokenSequence(NameField::Name);
        };

        match checker.check(&primary).await {
            ExistenceResult::Free => {
                info!(email = %primary, "primary candidate is free");
                return ResolutionOutcome::Resolved(primary);
            }
            ExistenceResult::Unknown => {
                warn!(email = %primary, "primary lookup failed");
                return ResolutionOutcome::LookupFailed;
            }
            ExistenceResult::Taken => debug!(email = %primary, "primary candidate is taken"),
        }

        if first.len() == 1 && surname.len() == 1 {
            info!(email = %primary, "single-token name pair already registered");
            return ResolutionOutcome::ConflictBothSingleToken;
        }

        let mut skipped = 0usize;
        for candidate in alternate_candidates(first, surname, &self.domain) {
            match checker.check(&candidate).await {
                ExistenceResult::Free => {
                    info!(email = %candidate, skipped, "resolved alternate candidate");
                    return ResolutionOutcome::Resolved(candidate);
                }
                ExistenceResult::Taken => debug!(email = %candidate, "candidate is taken"),
                ExistenceResult::Unknown => {
                    // One failed probe does not abort the search.
                    warn!(email = %candidate, "lookup failed, skipping candidate");
                    skipped += 1;
                }
            }
        }

        info!(skipped, "all name combinations exhausted");
        ResolutionOutcome::Exhausted
    }
}

impl ResolutionOutcome {
    pub fn into_result(self) -> Result<EmailCandidate, ResolutionFailure> {
        match self {
            ResolutionOutcome::Resolved(candidate) => Ok(candidate),
            ResolutionOutcome::Exhausted => Err(ResolutionFailure::Exhausted),
            ResolutionOutcome::ConflictBothSingleToken => {
                Err(ResolutionFailure::ConflictBothSingleToken)
            }
            ResolutionOutcome::LookupFailed => Err(ResolutionFailure::LookupFailed),
            ResolutionOutcome::EmptyTokenSequence(field) => {
                Err(ResolutionFailure::EmptyTokenSequence(field))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tokenizer::tokenize;
    use crate::test_support::StubDirectory;

    const DOMAIN: &str = "aiesec.org.br";

    fn tokens(words: &[&str]) -> NameTokens {
        words.iter().copied().collect()
    }

    fn address(local: &str) -> String {
        format!("{}@{}", local, DOMAIN)
    }

    fn resolved(local: &str) -> ResolutionOutcome {
        let (first, last) = local.split_once('.').unwrap();
        ResolutionOutcome::Resolved(EmailCandidate::new(first, last, DOMAIN))
    }

    #[tokio::test]
    async fn free_primary_resolves_immediately() {
        let directory = StubDirectory::new();
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(
                &tokens(&["caio", "henrique", "lima"]),
                &tokens(&["souza", "santos", "costa"]),
                &directory,
            )
            .await;

        assert_eq!(outcome, resolved("caio.costa"));
        assert_eq!(directory.checked(), vec![address("caio.costa")]);
    }

    #[tokio::test]
    async fn first_free_in_search_order_wins() {
        let directory = StubDirectory::new()
            .with_taken(&address("jo.santos"))
            .with_free(&address("jo.dos"))
            .with_free(&address("joao.santos"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["jo", "joao"]), &tokens(&["dos", "santos"]), &directory)
            .await;

        assert_eq!(outcome, resolved("jo.dos"));
        assert_eq!(
            directory.checked(),
            vec![address("jo.santos"), address("jo.dos")]
        );
    }

    #[tokio::test]
    async fn outer_loop_moves_to_next_first_name_token() {
        let directory = StubDirectory::new()
            .with_taken(&address("jo.santos"))
            .with_taken(&address("jo.dos"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["jo", "joao"]), &tokens(&["dos", "santos"]), &directory)
            .await;

        assert_eq!(outcome, resolved("joao.santos"));
    }

    #[tokio::test]
    async fn single_token_pair_taken_is_a_conflict() {
        let directory = StubDirectory::new().with_taken(&address("ana.silva"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["ana"]), &tokens(&["silva"]), &directory)
            .await;

        assert_eq!(outcome, ResolutionOutcome::ConflictBothSingleToken);
        assert_eq!(directory.calls(), 1);
    }

    #[tokio::test]
    async fn all_taken_is_exhausted_after_one_check_per_pair() {
        let directory = StubDirectory::new().taken_by_default();
        let resolver = EmailResolver::new(DOMAIN);
        let first = tokens(&["maria", "clara", "luiza"]);
        let surname = tokens(&["oliveira", "santos"]);

        let outcome = resolver.resolve(&first, &surname, &directory).await;

        assert_eq!(outcome, ResolutionOutcome::Exhausted);
        assert_eq!(directory.calls(), first.len() * surname.len());
    }

    #[tokio::test]
    async fn one_sided_single_token_still_searches() {
        let directory = StubDirectory::new()
            .with_taken(&address("ana.santos"))
            .with_free(&address("ana.costa"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["ana"]), &tokens(&["costa", "santos"]), &directory)
            .await;

        assert_eq!(outcome, resolved("ana.costa"));
    }

    #[tokio::test]
    async fn failed_primary_lookup_stops_the_run() {
        let directory = StubDirectory::new()
            .with_unknown(&address("jo.santos"))
            .with_free(&address("jo.dos"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["jo", "joao"]), &tokens(&["dos", "santos"]), &directory)
            .await;

        assert_eq!(outcome, ResolutionOutcome::LookupFailed);
        assert_eq!(directory.calls(), 1);
    }

    #[tokio::test]
    async fn failed_lookup_during_search_is_skipped() {
        let directory = StubDirectory::new()
            .with_taken(&address("jo.santos"))
            .with_unknown(&address("jo.dos"))
            .with_free(&address("joao.santos"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["jo", "joao"]), &tokens(&["dos", "santos"]), &directory)
            .await;

        assert_eq!(outcome, resolved("joao.santos"));
    }

    #[tokio::test]
    async fn taken_or_unknown_everywhere_is_exhausted() {
        let directory = StubDirectory::new()
            .taken_by_default()
            .with_unknown(&address("jo.dos"))
            .with_unknown(&address("joao.dos"));
        let resolver = EmailResolver::new(DOMAIN);

        let outcome = resolver
            .resolve(&tokens(&["jo", "joao"]), &tokens(&["dos", "santos"]), &directory)
            .await;

        assert_eq!(outcome, ResolutionOutcome::Exhausted);
    }

    #[tokio::test]
    async fn empty_sequences_are_rejected_without_checks() {
        let directory = StubDirectory::new();
        let resolver = EmailResolver::new(DOMAIN);

        let no_name = resolver
            .resolve(&tokenize("de da"), &tokenize("Silva"), &directory)
            .await;
        let no_surname = resolver
            .resolve(&tokenize("Ana"), &tokenize("e"), &directory)
            .await;

        assert_eq!(no_name, ResolutionOutcome::EmptyTokenSequence(NameField::Name));
        assert_eq!(
            no_surname,
            ResolutionOutcome::EmptyTokenSequence(NameField::Surname)
        );
        assert_eq!(directory.calls(), 0);
    }

    #[tokio::test]
    async fn repeated_runs_agree() {
        let directory = StubDirectory::new()
            .with_taken(&address("maria.silva"))
            .with_free(&address("maria.souza"))
            .with_free(&address("clara.silva"));
        let resolver = EmailResolver::new(DOMAIN);
        let first = tokenize("Maria Clara");
        let surname = tokenize("Souza da Silva");

        let once = resolver.resolve(&first, &surname, &directory).await;
        let twice = resolver.resolve(&first, &surname, &directory).await;

        assert_eq!(once, resolved("maria.souza"));
        assert_eq!(once, twice);
    }

    #[test]
    fn into_result_maps_failures() {
        assert_eq!(
            ResolutionOutcome::Exhausted.into_result(),
            Err(ResolutionFailure::Exhausted)
        );
        assert_eq!(
            ResolutionOutcome::LookupFailed.into_result(),
            Err(ResolutionFailure::LookupFailed)
        );
        assert_eq!(
            resolved("ana.silva").into_result().map(EmailCandidate::into_string),
            Ok(address("ana.silva"))
        );
    }
}
