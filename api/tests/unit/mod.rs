mod mailers;
