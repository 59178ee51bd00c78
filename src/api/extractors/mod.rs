/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - gateway middleware が検証した principal を handler に渡す
 */
mod principal;

pub use principal::{Principal, PrincipalExtractor};
