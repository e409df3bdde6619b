mod new;
mod others;
mod print;
mod property;
