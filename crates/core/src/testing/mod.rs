//! Testing utilities and mock implementations of the catalog providers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topactors_core::testing::{fixtures, MockCastLookup, MockMovieList};
//!
//! let (titles, casts) = fixtures::shawshank_catalog();
//! let movie_list = MockMovieList::with_titles(titles);
//! let lookup = MockCastLookup::with_casts(casts);
//!
//! let top = TopActors::new(Arc::new(movie_list), Arc::new(lookup), AggregatorConfig::default());
//! ```

mod mock_catalog;

pub use mock_catalog::{MockCastLookup, MockMovieList};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::HashMap;

    use crate::catalog::{ActorName, MovieTitle};

    /// Owned titles from string literals.
    pub fn titles(names: &[&str]) -> Vec<MovieTitle> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// Owned cast list from string literals.
    pub fn cast(names: &[&str]) -> Vec<ActorName> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// Six movies whose casts rank Johnny Depp first with 5 appearances,
    /// Mammooty and Mohanlal tied second with 3, and Stuart Little fourth
    /// with 1.
    pub fn shawshank_catalog() -> (Vec<MovieTitle>, HashMap<MovieTitle, Vec<ActorName>>) {
        let entries: [(&str, &[&str]); 6] = [
            ("The Shawshank Redemption", &["Johnny Depp", "Mohanlal"]),
            ("The Godfather", &["Johnny Depp", "Mohanlal"]),
            ("Shawshank Ascension", &["Johnny Depp", "Mammooty"]),
            ("Shawshank Ascension II", &["Johnny Depp", "Mammooty"]),
            ("Shawshank Ascension III", &["Johnny Depp", "Stuart Little"]),
            ("Shawshank Ascension IV", &["Mammooty", "Mohanlal"]),
        ];

        let movies = entries.iter().map(|(title, _)| title.to_string()).collect();
        let casts = entries
            .iter()
            .map(|(title, names)| (title.to_string(), cast(names)))
            .collect();

        (movies, casts)
    }

    /// `count` generated titles, each with a cast of `cast_size` actors drawn
    /// round-robin from a pool of `pool` names.
    pub fn generated_catalog(
        count: usize,
        cast_size: usize,
        pool: usize,
    ) -> (Vec<MovieTitle>, HashMap<MovieTitle, Vec<ActorName>>) {
        let movies: Vec<MovieTitle> = (1..=count).map(|i| format!("Movie {}", i)).collect();
        let casts = movies
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let cast = (0..cast_size)
                    .map(|j| format!("Actor {}", (i * 7 + j * 3) % pool))
                    .collect();
                (title.clone(), cast)
            })
            .collect();

        (movies, casts)
    }
}
