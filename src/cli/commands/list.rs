//! List movies command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_movies(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let movies = store.list_movies().await?;

    if movies.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Import legacy data with: livemovies seed");
        return Ok(());
    }

    println!("Movies ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        println!("{} ({}) [{}]", movie.name, movie.release_year, movie.language);
        println!(
            "  ID: {} | Rating: {} | Genre: {}",
            movie.id,
            movie.rating,
            if movie.genre.is_empty() {
                "-".to_string()
            } else {
                movie.genre.join(", ")
            }
        );
    }

    Ok(())
}
