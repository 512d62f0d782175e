//! Subcommand implementations, one module per resource.

pub mod auth;
pub mod performances;
pub mod reviews;
pub mod users;

use encore_core::models::User;

use crate::output;

/// Print the fields of a user profile.
pub(crate) fn print_user(user: &User) {
    output::field("ID", &user.id.to_string());
    output::field("Name", user.display_name());
    output::field("Email", &user.email);
    output::optional_field("Role", user.role.as_deref());
    output::optional_field("Band", user.band_name.as_deref());
    output::optional_field("Instagram", user.instagram_id.as_deref());
    output::optional_field("Genres", user.favorite_genres.as_deref());
    output::optional_field("Bio", user.bio.as_deref());
}
