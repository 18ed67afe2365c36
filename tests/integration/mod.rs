//! Integration tests for pinseed

mod cli_commands;
mod pin_persistence;
mod seeding;
