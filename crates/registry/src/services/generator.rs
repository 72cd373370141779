use crate::models::email::{EmailCandidate, NameTokens};

/// Builds `{first name token}.{last surname token}@{domain}`.
///
/// Returns `None` when either sequence is empty.
pub fn primary_candidate(
    first: &NameTokens,
    surname: &NameTokens,
    domain: &str,
) -> Option<EmailCandidate> {
    Some(EmailCandidate::new(first.first()?, surname.last()?, domain))
}

/// Index pairs in search order: first-name tokens ascending, and for each of
/// them surname tokens from last to first.
pub fn search_order(first_len: usize, surname_len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..first_len).flat_map(move |i| (0..surname_len).rev().map(move |j| (i, j)))
}

/// Every candidate after the primary one, in search order.
///
/// The pair `(0, last)` is the primary candidate and is left out.
pub fn alternate_candidates<'a>(
    first: &'a NameTokens,
    surname: &'a NameTokens,
    domain: &'a str,
) -> impl Iterator<Item = EmailCandidate> + 'a {
    let primary = (0, surname.len().saturating_sub(1));
    search_order(first.len(), surname.len())
        .filter(move |pair| *pair != primary)
        .filter_map(move |(i, j)| {
            Some(EmailCandidate::new(first.get(i)?, surname.get(j)?, domain))
        })
}
