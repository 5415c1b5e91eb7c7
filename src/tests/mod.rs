mod support;

mod coordinator_tests;
mod page_tests;
mod ring_buffer_tests;
