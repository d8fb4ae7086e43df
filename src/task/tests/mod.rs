//! Real switches on the host architecture, driven through [`harness::Core`].

mod rotation;
