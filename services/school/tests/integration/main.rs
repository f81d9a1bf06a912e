mod access_test;
mod certificate_test;
mod helpers;
mod lesson_test;
