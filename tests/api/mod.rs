mod auth_tests;
mod chat_room_tests;
mod health_tests;
mod host_tests;
