mod auth;
mod full_run;
mod health;
mod users;
